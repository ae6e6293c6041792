use crate::domain::model::{ClinicRecord, PlaceProperties, PlacesResponse};

const HOSPITAL_KEYWORD: &str = "hospital";
const GYNAE_KEYWORDS: [&str; 4] = ["gyne", "gynae", "women", "obstetric"];
const GENERIC_NAMES: [&str; 3] = ["clinic", "women clinic", "hospital"];
pub const FALLBACK_DISPLAY_NAME: &str = "Women's Clinic";

/// 醫院或婦產科相關的地點才保留。關鍵字為子字串比對，不是整字比對。
pub fn is_clinic_match(properties: &PlaceProperties) -> bool {
    let name = properties.name.as_deref().unwrap_or_default().to_lowercase();

    let is_hospital = properties
        .categories
        .iter()
        .any(|cat| cat.to_lowercase().contains(HOSPITAL_KEYWORD))
        || name.contains(HOSPITAL_KEYWORD);
    let is_gynae = GYNAE_KEYWORDS.iter().any(|word| name.contains(word));

    is_hospital || is_gynae
}

/// 名稱空白或過於通用時，改用地址
pub fn display_name(properties: &PlaceProperties) -> String {
    let name = properties.name.as_deref().unwrap_or_default();
    let is_generic = GENERIC_NAMES.contains(&name.to_lowercase().as_str());

    if !name.is_empty() && !is_generic {
        return name.to_string();
    }

    [&properties.address_line1, &properties.formatted]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .cloned()
        .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string())
}

pub fn filter_clinics(response: &PlacesResponse) -> Vec<ClinicRecord> {
    let mut clinics = Vec::new();

    for feature in &response.features {
        if !is_clinic_match(&feature.properties) {
            continue;
        }

        let Some(position) = feature.geometry.position() else {
            tracing::debug!(
                "Skipping place without coordinates: {:?}",
                feature.properties.name
            );
            continue;
        };

        clinics.push(ClinicRecord {
            display_name: display_name(&feature.properties),
            lat: position.lat,
            lon: position.lon,
            categories: feature.properties.categories.clone(),
        });
    }

    tracing::debug!(
        "Kept {} of {} places as clinics",
        clinics.len(),
        response.features.len()
    );
    clinics
}

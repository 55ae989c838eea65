use crate::country::Country;

const OEC_BASE: &str = "https://oec.world/en";

/// Trade-data code used by OEC, lowercase
pub fn oec_code(country: &Country) -> String {
    country
        .oec_code
        .as_deref()
        .unwrap_or(&country.alpha3)
        .to_lowercase()
}

/// Embeddable exports tree map for the country
pub fn embed_url(country: &Country) -> String {
    format!(
        "{OEC_BASE}/visualize/embed/tree_map/hs92/export/{}/all/show/2022/?controls=false&title=false&click=false",
        oec_code(country)
    )
}

pub fn profile_url(country: &Country) -> String {
    format!(
        "{OEC_BASE}/profile/country/{}",
        country.alpha3.to_lowercase()
    )
}

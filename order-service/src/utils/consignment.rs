//! Consignment identifiers: `CID` + `YYMMDD` + city code + 4 random `[A-Z0-9]`.

use chrono::{DateTime, Utc};
use rand::Rng;

pub const CONSIGNMENT_PREFIX: &str = "CID";
pub const CONSIGNMENT_ID_LEN: usize = 16;

const SUFFIX_LEN: usize = 4;
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Three-letter routing code for a recipient city.
pub fn city_code(city: i32) -> &'static str {
    match city {
        1 => "DHA",
        _ => "OTH",
    }
}

pub fn generate_consignment_id(city_code: &str) -> String {
    generate_consignment_id_at(Utc::now(), city_code)
}

pub fn generate_consignment_id_at(now: DateTime<Utc>, city_code: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    format!(
        "{}{}{}{}",
        CONSIGNMENT_PREFIX,
        now.format("%y%m%d"),
        city_code,
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_layout() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        let id = generate_consignment_id_at(now, city_code(1));

        assert_eq!(id.len(), CONSIGNMENT_ID_LEN);
        assert!(id.starts_with("CID240307DHA"));
        assert!(id[12..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_city_codes() {
        assert_eq!(city_code(1), "DHA");
        assert_eq!(city_code(7), "OTH");
    }

    #[test]
    fn test_suffix_varies() {
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| generate_consignment_id("DHA")).collect();
        assert!(ids.len() > 1);
    }
}

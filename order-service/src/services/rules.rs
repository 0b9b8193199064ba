//! Business rules for order submissions: field whitelist, phone format and fees.

use once_cell::sync::Lazy;
use regex::Regex;
use service_core::error::FieldErrors;

use crate::dtos::OrderSubmission;

pub const VALID_STORE_ID: i64 = 131172;
pub const VALID_RECIPIENT_CITY: i32 = 1;
pub const VALID_RECIPIENT_ZONE: i32 = 1;
pub const VALID_DELIVERY_TYPE: i32 = 48;
pub const VALID_ITEM_TYPE: i32 = 2;
pub const VALID_ITEM_QUANTITY: i32 = 1;
pub const VALID_ITEM_WEIGHT: f64 = 0.5;

pub const BASE_DELIVERY_FEE: f64 = 60.0;
pub const OUTSIDE_CITY_DELIVERY_FEE: f64 = 100.0;
pub const COD_FEE_RATE: f64 = 0.01;

pub const INVALID_PHONE_MESSAGE: &str = "Invalid phone number";

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^01[3-9][0-9]{8}$").expect("Invalid regex"));

/// A whitelisted field: required, and equal to exactly one value.
struct Whitelisted<T> {
    field: &'static str,
    value: Option<T>,
    allowed: T,
    required: &'static str,
    invalid: &'static str,
}

fn check_whitelisted<T>(errors: &mut FieldErrors, rule: Whitelisted<T>)
where
    T: PartialEq + Default,
{
    // Zero is indistinguishable from an omitted field.
    let message = match rule.value {
        None => rule.required,
        Some(v) if v == T::default() => rule.required,
        Some(v) if v != rule.allowed => rule.invalid,
        Some(_) => return,
    };
    push(errors, rule.field, message);
}

fn check_text(errors: &mut FieldErrors, field: &'static str, value: Option<&str>, required: &str) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        push(errors, field, required);
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Every rule violation in the submission, keyed by field. Empty means valid.
pub fn validate_submission(order: &OrderSubmission) -> FieldErrors {
    let mut errors = FieldErrors::new();

    check_whitelisted(
        &mut errors,
        Whitelisted {
            field: "store_id",
            value: order.store_id,
            allowed: VALID_STORE_ID,
            required: "The store field is required",
            invalid: "Wrong Store selected",
        },
    );
    check_text(
        &mut errors,
        "recipient_name",
        order.recipient_name.as_deref(),
        "The recipient name field is required.",
    );
    check_text(
        &mut errors,
        "recipient_phone",
        order.recipient_phone.as_deref(),
        "The recipient phone field is required.",
    );
    check_text(
        &mut errors,
        "recipient_address",
        order.recipient_address.as_deref(),
        "The recipient address field is required.",
    );
    check_whitelisted(
        &mut errors,
        Whitelisted {
            field: "recipient_city",
            value: order.recipient_city,
            allowed: VALID_RECIPIENT_CITY,
            required: "The recipient city field is required.",
            invalid: "Invalid city selected",
        },
    );
    check_whitelisted(
        &mut errors,
        Whitelisted {
            field: "recipient_zone",
            value: order.recipient_zone,
            allowed: VALID_RECIPIENT_ZONE,
            required: "The recipient zone field is required.",
            invalid: "Invalid zone selected",
        },
    );
    check_whitelisted(
        &mut errors,
        Whitelisted {
            field: "delivery_type",
            value: order.delivery_type,
            allowed: VALID_DELIVERY_TYPE,
            required: "The delivery type field is required.",
            invalid: "Invalid delivery type selected",
        },
    );
    check_whitelisted(
        &mut errors,
        Whitelisted {
            field: "item_type",
            value: order.item_type,
            allowed: VALID_ITEM_TYPE,
            required: "The item type field is required.",
            invalid: "Invalid item type selected",
        },
    );
    check_whitelisted(
        &mut errors,
        Whitelisted {
            field: "item_quantity",
            value: order.item_quantity,
            allowed: VALID_ITEM_QUANTITY,
            required: "The item quantity field is required.",
            invalid: "Invalid item quantity selected",
        },
    );
    check_whitelisted(
        &mut errors,
        Whitelisted {
            field: "item_weight",
            value: order.item_weight,
            allowed: VALID_ITEM_WEIGHT,
            required: "The item weight field is required.",
            invalid: "Invalid item weight selected",
        },
    );
    if order.amount_to_collect.map_or(true, |a| a == 0.0) {
        push(
            &mut errors,
            "amount_to_collect",
            "The amount to collect field is required.",
        );
    }

    if errors.is_empty() {
        let phone = order.recipient_phone.as_deref().unwrap_or_default();
        if !is_valid_phone(phone.trim()) {
            push(&mut errors, "recipient_phone", INVALID_PHONE_MESSAGE);
        }
    }

    errors
}

pub fn delivery_fee(recipient_city: i32) -> f64 {
    if recipient_city == VALID_RECIPIENT_CITY {
        BASE_DELIVERY_FEE
    } else {
        OUTSIDE_CITY_DELIVERY_FEE
    }
}

/// Exactly one percent of the collected amount. Not rounded.
pub fn cod_fee(amount_to_collect: f64) -> f64 {
    amount_to_collect * COD_FEE_RATE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> OrderSubmission {
        OrderSubmission {
            store_id: Some(VALID_STORE_ID),
            merchant_order_id: Some("MO-1".to_string()),
            recipient_name: Some("Rahim".to_string()),
            recipient_phone: Some("01712345678".to_string()),
            recipient_address: Some("House 1, Road 2, Banani".to_string()),
            recipient_city: Some(1),
            recipient_zone: Some(1),
            recipient_area: Some(1),
            delivery_type: Some(48),
            item_type: Some(2),
            special_instruction: None,
            item_quantity: Some(1),
            item_weight: Some(0.5),
            amount_to_collect: Some(500.0),
            item_description: None,
        }
    }

    #[test]
    fn test_valid_submission_has_no_errors() {
        assert!(validate_submission(&valid_submission()).is_empty());
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let errors = validate_submission(&OrderSubmission::default());

        let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(
            fields,
            vec![
                "amount_to_collect",
                "delivery_type",
                "item_quantity",
                "item_type",
                "item_weight",
                "recipient_address",
                "recipient_city",
                "recipient_name",
                "recipient_phone",
                "recipient_zone",
                "store_id",
            ]
        );
        assert_eq!(errors["store_id"], vec!["The store field is required"]);
    }

    #[test]
    fn test_zero_counts_as_missing() {
        let mut order = valid_submission();
        order.item_quantity = Some(0);
        order.amount_to_collect = Some(0.0);

        let errors = validate_submission(&order);
        assert_eq!(errors["item_quantity"], vec!["The item quantity field is required."]);
        assert_eq!(
            errors["amount_to_collect"],
            vec!["The amount to collect field is required."]
        );
    }

    #[test]
    fn test_wrong_value_message_differs_from_required() {
        let cases: Vec<(&str, Box<dyn Fn(&mut OrderSubmission)>)> = vec![
            ("store_id", Box::new(|o: &mut OrderSubmission| o.store_id = Some(1))),
            ("recipient_city", Box::new(|o: &mut OrderSubmission| o.recipient_city = Some(2))),
            ("recipient_zone", Box::new(|o: &mut OrderSubmission| o.recipient_zone = Some(9))),
            ("delivery_type", Box::new(|o: &mut OrderSubmission| o.delivery_type = Some(12))),
            ("item_type", Box::new(|o: &mut OrderSubmission| o.item_type = Some(1))),
            ("item_quantity", Box::new(|o: &mut OrderSubmission| o.item_quantity = Some(3))),
            ("item_weight", Box::new(|o: &mut OrderSubmission| o.item_weight = Some(2.0))),
        ];

        let missing = validate_submission(&OrderSubmission::default());
        for (field, mutate) in cases {
            let mut order = valid_submission();
            mutate(&mut order);
            let errors = validate_submission(&order);

            assert_eq!(errors.len(), 1, "only {} should fail", field);
            assert_ne!(errors[field], missing[field], "{} messages must differ", field);
        }
    }

    #[test]
    fn test_blank_text_is_missing() {
        let mut order = valid_submission();
        order.recipient_name = Some("   ".to_string());

        let errors = validate_submission(&order);
        assert_eq!(errors["recipient_name"], vec!["The recipient name field is required."]);
    }

    #[test]
    fn test_phone_checked_only_after_whitelist_passes() {
        let mut order = valid_submission();
        order.recipient_phone = Some("12345".to_string());
        assert_eq!(
            validate_submission(&order)["recipient_phone"],
            vec![INVALID_PHONE_MESSAGE]
        );

        order.store_id = None;
        let errors = validate_submission(&order);
        assert!(!errors.contains_key("recipient_phone"));
        assert!(errors.contains_key("store_id"));
    }

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("01312345678"));
        assert!(is_valid_phone("01912345678"));
        assert!(!is_valid_phone("01212345678"));
        assert!(!is_valid_phone("0171234567"));
        assert!(!is_valid_phone("017123456789"));
        assert!(!is_valid_phone("+8801712345678"));
    }

    #[test]
    fn test_fees() {
        assert_eq!(delivery_fee(VALID_RECIPIENT_CITY), 60.0);
        assert_eq!(delivery_fee(2), 100.0);
        assert_eq!(cod_fee(500.0), 5.0);
    }

    #[test]
    fn test_cod_fee_keeps_sub_cent_precision() {
        assert_eq!(cod_fee(0.5), 0.005);
        assert!((cod_fee(123.45) - 1.2345).abs() < 1e-12);
        assert_ne!(cod_fee(123.45), 1.23);
    }
}

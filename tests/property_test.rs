use {
    order_sync::adapters::signature::SignatureHeader,
    order_sync::domain::{
        money::MoneyAmount,
        order::OrderStatus,
        payment::PaymentStatus,
    },
    proptest::prelude::*,
    rust_decimal::Decimal,
};

fn arb_status() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::Approved),
        Just(PaymentStatus::Pending),
        Just(PaymentStatus::Authorized),
        Just(PaymentStatus::InProcess),
        Just(PaymentStatus::InMediation),
        Just(PaymentStatus::Rejected),
        Just(PaymentStatus::Cancelled),
        Just(PaymentStatus::Refunded),
        Just(PaymentStatus::ChargedBack),
        Just(PaymentStatus::Unknown),
    ]
}

proptest! {
    /// Status parsing is total: any string yields a status, and the mapping
    /// onto the order lifecycle is defined for all of them.
    #[test]
    fn raw_status_parse_and_mapping_are_total(raw in ".*") {
        let status = PaymentStatus::from_raw(&raw);
        let _ = status.order_status();
    }

    /// Strings outside the known provider vocabulary always land on
    /// pending_payment via Unknown.
    #[test]
    fn unknown_raw_statuses_map_to_pending_payment(raw in "[a-z_]{1,20}") {
        let status = PaymentStatus::from_raw(&raw);
        if status == PaymentStatus::Unknown {
            prop_assert_eq!(status.order_status(), OrderStatus::PendingPayment);
        }
    }

    /// Only `rejected` maps back to the pre-payment state, and only
    /// `approved`/`refunded` reach their terminal states.
    #[test]
    fn mapping_matches_the_table(status in arb_status()) {
        let mapped = status.order_status();
        match status {
            PaymentStatus::Approved => prop_assert_eq!(mapped, OrderStatus::Paid),
            PaymentStatus::Refunded => prop_assert_eq!(mapped, OrderStatus::Refunded),
            PaymentStatus::Rejected => prop_assert_eq!(mapped, OrderStatus::Created),
            _ => prop_assert_eq!(mapped, OrderStatus::PendingPayment),
        }
    }

    /// as_str → from_raw roundtrip is identity for every known status.
    #[test]
    fn status_roundtrip(status in arb_status()) {
        prop_assert_eq!(PaymentStatus::from_raw(status.as_str()), status);
    }

    /// cents → major units → cents is lossless.
    #[test]
    fn money_major_unit_roundtrip(cents in 0i64..=92_233_720_368_547_758) {
        let amount = MoneyAmount::new(cents).unwrap();
        let back = MoneyAmount::from_major(amount.major_units()).unwrap();
        prop_assert_eq!(back.cents(), cents);
    }

    /// Converting a whole major-unit amount multiplies by exactly 100.
    #[test]
    fn whole_major_amounts_scale_by_100(major in 0i64..=92_233_720_368_547) {
        let amount = MoneyAmount::from_major(Decimal::new(major, 0)).unwrap();
        prop_assert_eq!(amount.cents(), major * 100);
    }

    /// Header parsing never panics, whatever arrives in x-signature.
    #[test]
    fn signature_header_parse_never_panics(header in ".*") {
        let _ = SignatureHeader::parse(&header);
    }

    /// A well-formed header always parses and preserves the digest.
    #[test]
    fn signature_header_roundtrip(ts in "[0-9]{1,12}", digest in "[0-9a-f]{64}") {
        let header = format!("ts={ts},v1={digest}");
        let parsed = SignatureHeader::parse(&header).unwrap();
        prop_assert_eq!(parsed.ts.as_deref(), Some(ts.as_str()));
        prop_assert_eq!(parsed.v1, digest);
    }
}

// Tests for monetary value types: currency checks, ranges and aggregation

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use vatlayer::core::{AppError, Currency, Money, MoneyRange, Price, TaxedMoney, TaxedMoneyRange};

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

fn taxed(net: Decimal, gross: Decimal) -> TaxedMoney {
    TaxedMoney::new(usd(net), usd(gross)).unwrap()
}

proptest! {
    #[test]
    fn test_sum_matches_componentwise_addition(
        cents in prop::collection::vec((0i64..1_000_000i64, 0i64..1_000_000i64), 0..20)
    ) {
        let items: Vec<TaxedMoney> = cents
            .iter()
            .map(|(net, tax)| taxed(Decimal::new(*net, 2), Decimal::new(net + tax, 2)))
            .collect();

        let total = TaxedMoney::sum(Currency::USD, &items).unwrap();

        let net: Decimal = items.iter().map(|item| item.net().amount).sum();
        let gross: Decimal = items.iter().map(|item| item.gross().amount).sum();
        prop_assert_eq!(total.net().amount, net);
        prop_assert_eq!(total.gross().amount, gross);
        prop_assert_eq!(total.tax().amount, gross - net);
    }

    #[test]
    fn test_times_scales_both_sides(
        net in 0i64..1_000_000i64,
        tax in 0i64..100_000i64,
        quantity in 0u32..1000u32
    ) {
        let unit = taxed(Decimal::new(net, 2), Decimal::new(net + tax, 2));
        let line = unit.times(quantity);
        prop_assert_eq!(line.net().amount, unit.net().amount * Decimal::from(quantity));
        prop_assert_eq!(line.gross().amount, unit.gross().amount * Decimal::from(quantity));
    }
}

#[test]
fn test_taxed_money_rejects_mixed_currencies() {
    let err = TaxedMoney::new(usd(dec!(10)), Money::new(dec!(12.30), Currency::EUR)).unwrap_err();
    assert!(matches!(
        err,
        AppError::CurrencyMismatch { left, right }
            if left == Currency::USD && right == Currency::EUR
    ));
}

#[test]
fn test_sum_rejects_mixed_currencies() {
    let items = [
        taxed(dec!(10), dec!(12.30)),
        TaxedMoney::from_untaxed(Money::new(dec!(5), Currency::PLN)),
    ];
    assert!(matches!(
        TaxedMoney::sum(Currency::USD, &items),
        Err(AppError::CurrencyMismatch { .. })
    ));
}

#[test]
fn test_voucher_is_subtracted_from_both_sides_and_floored() {
    let total = taxed(dec!(40.65), dec!(50.00));

    let discounted = total.try_sub_money(&usd(dec!(3))).unwrap();
    assert_eq!(discounted.net().amount, dec!(37.65));
    assert_eq!(discounted.gross().amount, dec!(47.00));

    let floored = total.try_sub_money(&usd(dec!(45))).unwrap().max_zero();
    assert_eq!(floored.net().amount, Decimal::ZERO);
    assert_eq!(floored.gross().amount, dec!(5.00));
}

#[test]
fn test_money_range_ordering() {
    assert!(MoneyRange::new(usd(dec!(100)), usd(dec!(200))).is_ok());
    assert!(MoneyRange::new(usd(dec!(100)), usd(dec!(100))).is_ok());
    assert!(matches!(
        MoneyRange::new(usd(dec!(200)), usd(dec!(100))),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        MoneyRange::new(usd(dec!(1)), Money::new(dec!(2), Currency::EUR)),
        Err(AppError::CurrencyMismatch { .. })
    ));
}

#[test]
fn test_taxed_range_is_ordered_by_gross() {
    let range =
        TaxedMoneyRange::new(taxed(dec!(81.30), dec!(100)), taxed(dec!(162.60), dec!(200)))
            .unwrap();
    assert_eq!(range.currency(), Currency::USD);
    assert!(TaxedMoneyRange::new(taxed(dec!(90), dec!(200)), taxed(dec!(95), dec!(100))).is_err());
}

#[test]
fn test_quantize_rounds_half_up() {
    let value = taxed(dec!(4.065), dec!(5.005)).quantize();
    assert_eq!(value.net().amount, dec!(4.07));
    assert_eq!(value.gross().amount, dec!(5.01));
}

#[test]
fn test_taxed_money_deserialization_checks_currency() {
    let ok: TaxedMoney = serde_json::from_value(json!({
        "net": {"amount": "10.00", "currency": "USD"},
        "gross": {"amount": "12.30", "currency": "USD"}
    }))
    .unwrap();
    assert_eq!(ok.tax().amount, dec!(2.30));

    let mixed = serde_json::from_value::<TaxedMoney>(json!({
        "net": {"amount": "10.00", "currency": "USD"},
        "gross": {"amount": "12.30", "currency": "EUR"}
    }));
    assert!(mixed.is_err());
}

#[test]
fn test_price_from_json_shapes() {
    let money = Price::from_json(&json!({"amount": 10.5, "currency": "usd"})).unwrap();
    assert_eq!(money, Price::Money(usd(dec!(10.5))));

    let taxed_range = Price::from_json(&json!({
        "start": {"net": {"amount": "1", "currency": "USD"}, "gross": {"amount": "2", "currency": "USD"}},
        "stop": {"net": {"amount": "3", "currency": "USD"}, "gross": {"amount": "4", "currency": "USD"}}
    }))
    .unwrap();
    assert!(matches!(taxed_range, Price::TaxedRange(_)));

    let mixed = Price::from_json(&json!({
        "start": {"amount": "1", "currency": "USD"},
        "stop": {"net": {"amount": "3", "currency": "USD"}, "gross": {"amount": "4", "currency": "USD"}}
    }));
    assert!(matches!(mixed, Err(AppError::InvalidInputType(_))));

    assert!(matches!(
        Price::from_json(&json!("12.00")),
        Err(AppError::InvalidInputType(_))
    ));
}

//! Budget service for derived totals and tax requests.

use rust_decimal::Decimal;
use tally_shared::types::{BudgetId, checked_sum, or_zero, saturating_sum};

use super::types::{
    AppliedTax, AppliedTaxAmount, ApplyTaxRequest, BudgetLineItem, BudgetTotals, TaxLine,
};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Sum of row totals. Unset totals count as zero.
    ///
    /// Saturates at the `Decimal` range; [`Self::checked_grand_total`] tells
    /// whether it did.
    #[must_use]
    pub fn grand_total(items: &[BudgetLineItem]) -> Decimal {
        saturating_sum(items.iter().map(|item| or_zero(item.total_amount)))
    }

    /// Sum of row totals, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn checked_grand_total(items: &[BudgetLineItem]) -> Option<Decimal> {
        checked_sum(items.iter().map(|item| or_zero(item.total_amount)))
    }

    /// Computes every derived figure from the rows and applied taxes.
    ///
    /// Nothing is cached: callers recompute whenever rows or taxes change.
    /// Values are not rounded here.
    #[must_use]
    pub fn totals(items: &[BudgetLineItem], taxes: &[AppliedTax]) -> BudgetTotals {
        let grand_total = Self::grand_total(items);
        let total_actual =
            saturating_sum(items.iter().map(|item| or_zero(item.actual_amount)));

        let tax_lines: Vec<TaxLine> = taxes
            .iter()
            .map(|tax| TaxLine {
                amount: tax.amount_on(grand_total),
                tax: tax.clone(),
            })
            .collect();
        let total_tax = saturating_sum(tax_lines.iter().map(|line| line.amount));

        BudgetTotals {
            grand_total,
            total_actual,
            tax_lines,
            total_tax,
            grand_total_net_of_tax: grand_total.saturating_sub(total_tax),
        }
    }

    /// Builds the apply-tax body. The base amount is the grand total.
    #[must_use]
    pub fn tax_request(budget_id: &BudgetId, totals: &BudgetTotals) -> ApplyTaxRequest {
        ApplyTaxRequest {
            budget_id: budget_id.clone(),
            base_amount: totals.grand_total,
            taxes: totals
                .tax_lines
                .iter()
                .map(|line| AppliedTaxAmount {
                    tax_id: line.tax.tax_id.clone(),
                    tax_name: line.tax.tax_name.clone(),
                    percentage: line.tax.percentage,
                    amount: line.amount,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::BudgetType;
    use rust_decimal_macros::dec;

    fn row(total: Option<Decimal>) -> BudgetLineItem {
        BudgetLineItem {
            total_amount: total,
            ..BudgetLineItem::empty(BudgetType::Income)
        }
    }

    #[test]
    fn test_grand_total_treats_unset_as_zero() {
        let items: Vec<BudgetLineItem> = serde_json::from_str(
            r#"[{"total_amount": "10.00"}, {"total_amount": ""}, {"total_amount": "5.5"}]"#,
        )
        .unwrap();
        assert_eq!(BudgetService::grand_total(&items), dec!(15.5));
    }

    #[test]
    fn test_income_totals_with_tax() {
        let items = [row(Some(dec!(100))), row(Some(dec!(200)))];
        let taxes = [AppliedTax::new("gst", "GST", dec!(10))];
        let totals = BudgetService::totals(&items, &taxes);

        assert_eq!(totals.grand_total, dec!(300));
        assert_eq!(totals.tax_lines.len(), 1);
        assert_eq!(totals.tax_lines[0].amount, dec!(30));
        assert_eq!(totals.total_tax, dec!(30));
        assert_eq!(totals.grand_total_net_of_tax, dec!(270));
    }

    #[test]
    fn test_multiple_taxes_sum() {
        let items = [row(Some(dec!(1000)))];
        let taxes = [
            AppliedTax::new("gst", "GST", dec!(18)),
            AppliedTax::new("cess", "Cess", dec!(2.5)),
        ];
        let totals = BudgetService::totals(&items, &taxes);
        assert_eq!(totals.total_tax, dec!(205));
        assert_eq!(totals.grand_total_net_of_tax, dec!(795));
    }

    #[test]
    fn test_totals_empty() {
        let totals = BudgetService::totals(&[], &[]);
        assert_eq!(totals.grand_total, Decimal::ZERO);
        assert_eq!(totals.total_tax, Decimal::ZERO);
        assert_eq!(totals.grand_total_net_of_tax, Decimal::ZERO);
        assert!(totals.tax_lines.is_empty());
    }

    #[test]
    fn test_total_actual() {
        let mut a = row(Some(dec!(50)));
        a.actual_amount = Some(dec!(45.25));
        let b = row(Some(dec!(20)));
        let totals = BudgetService::totals(&[a, b], &[]);
        assert_eq!(totals.total_actual, dec!(45.25));
    }

    #[test]
    fn test_totals_near_decimal_max_saturate() {
        let items = [row(Some(Decimal::MAX)), row(Some(Decimal::MAX))];
        let taxes = [AppliedTax::new("gst", "GST", dec!(100))];
        let totals = BudgetService::totals(&items, &taxes);

        assert_eq!(totals.grand_total, Decimal::MAX);
        assert!(totals.tax_lines[0].amount >= Decimal::MAX - Decimal::ONE);
        assert_eq!(totals.total_tax, totals.tax_lines[0].amount);
        assert!(totals.grand_total_net_of_tax >= Decimal::ZERO);
        assert!(totals.grand_total_net_of_tax <= Decimal::ONE);
        assert_eq!(BudgetService::checked_grand_total(&items), None);
    }

    #[test]
    fn test_large_tax_product_does_not_overflow() {
        let big = |n: i128| Decimal::from_i128_with_scale(n, 0);
        let items = [row(Some(big(10_i128.pow(27))))];
        let taxes = [
            AppliedTax::new("full", "Full", dec!(100)),
            AppliedTax::new("half", "Half", dec!(50)),
        ];
        let totals = BudgetService::totals(&items, &taxes);

        assert_eq!(totals.tax_lines[0].amount, big(10_i128.pow(27)));
        assert_eq!(totals.tax_lines[1].amount, big(5 * 10_i128.pow(26)));
        assert_eq!(totals.total_tax, big(15 * 10_i128.pow(26)));
        assert_eq!(totals.grand_total_net_of_tax, big(-5 * 10_i128.pow(26)));
    }

    #[test]
    fn test_checked_grand_total_in_range() {
        let items = [row(Some(dec!(100))), row(None)];
        assert_eq!(BudgetService::checked_grand_total(&items), Some(dec!(100)));
    }

    #[test]
    fn test_tax_request_uses_grand_total_as_base() {
        let items = [row(Some(dec!(100))), row(Some(dec!(200)))];
        let taxes = [AppliedTax::new("gst", "GST", dec!(10))];
        let totals = BudgetService::totals(&items, &taxes);
        let request = BudgetService::tax_request(&BudgetId::new("b-1"), &totals);

        assert_eq!(request.base_amount, dec!(300));
        assert_eq!(request.taxes.len(), 1);
        assert_eq!(request.taxes[0].amount, dec!(30));
        assert_eq!(request.taxes[0].tax_id.as_str(), "gst");
    }
}

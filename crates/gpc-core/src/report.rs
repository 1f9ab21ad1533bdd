//! Pro-Report payload assembly.
//!
//! The report renderer and delivery service are external collaborators; this
//! module only assembles what they consume: the raw input and result records,
//! display-ready strings (money with thousands separators and no decimals,
//! percentages with two decimals), the localized label deck and the report
//! metadata. The generation timestamp is caller-supplied so the engine stays
//! clock-free.

use serde::Serialize;

use crate::types::{round_money, Country, Currency, Lang, Money, Percent, Purpose};
use crate::valuation::{ValuationInput, ValuationOutput};

/// Brand shown on the report cover.
pub const BRAND: &str = "MyGPC";

/// Website printed in the report footer.
pub const WEBSITE: &str = "https://www.mygpc.co";

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format a monetary amount with thousands separators and no decimals.
pub fn fmt_money(amount: Money) -> String {
    let rounded = round_money(amount);
    let mut digits = rounded.abs().to_string();
    if let Some(dot) = digits.find('.') {
        digits.truncate(dot);
    }
    let mut reversed = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            reversed.push(',');
        }
        reversed.push(ch);
    }
    let grouped: String = reversed.chars().rev().collect();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a percentage with two decimal places, e.g. `4.03%`.
pub fn fmt_pct2(pct: Percent) -> String {
    format!("{:.2}%", pct)
}

// ---------------------------------------------------------------------------
// Localized labels
// ---------------------------------------------------------------------------

/// Static localized copy consumed by the report renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ReportLabels {
    pub brand: &'static str,
    pub title: &'static str,
    pub country: &'static str,
    pub currency: &'static str,
    pub estimate_tag: &'static str,
    pub investment_title: &'static str,
    pub net_yield: &'static str,
    pub net_annual_rent: &'static str,
    pub upfront_costs: &'static str,
    pub gross_annual_rent: &'static str,
    pub agent_fee_annual: &'static str,
    pub holding_annual: &'static str,
    pub interest_annual: &'static str,
    pub loan_amount: &'static str,
    pub cash_deposit: &'static str,
    pub breakdown: &'static str,
    pub stamp_duty: &'static str,
    pub gov_fees: &'static str,
    pub other_one_off_costs: &'static str,
    pub annual_cashflow: &'static str,
    pub sensitivity: &'static str,
    pub sensitivity_hint: &'static str,
    pub owner_title: &'static str,
    pub annual_fixed: &'static str,
    pub per_month: &'static str,
    pub first_year: &'static str,
    pub council_tax: &'static str,
    pub utilities: &'static str,
    pub property_tax: &'static str,
    pub service_charge: &'static str,
    pub disclaimer: &'static str,
    pub note_gov: &'static str,
}

const EN_LABELS: ReportLabels = ReportLabels {
    brand: BRAND,
    title: "Global Property Calculator",
    country: "Country",
    currency: "Currency",
    estimate_tag: "Estimate",
    investment_title: "Estimated Cash-on-Cash ROI",
    net_yield: "Net yield (on price)",
    net_annual_rent: "Net annual rent",
    upfront_costs: "Upfront costs",
    gross_annual_rent: "Gross annual rent",
    agent_fee_annual: "Letting agent fee (annual)",
    holding_annual: "Annual holding costs",
    interest_annual: "Annual interest cost",
    loan_amount: "Loan amount",
    cash_deposit: "Cash deposit",
    breakdown: "Cost breakdown",
    stamp_duty: "Stamp Duty / transfer tax",
    gov_fees: "Government / Solicitor fees (Estimated)",
    other_one_off_costs: "Other one-off costs",
    annual_cashflow: "Annual cashflow",
    sensitivity: "Sensitivity (Rent vs APR)",
    sensitivity_hint:
        "Cash-on-Cash ROI (%) under Rent change × APR change. Interest-only assumed.",
    owner_title: "Estimated Outgoings (Self-use)",
    annual_fixed: "Annual fixed outgoings",
    per_month: "Per month",
    first_year: "First-year total outgoings",
    council_tax: "Council tax (Estimated)",
    utilities: "Utilities + broadband (Estimated)",
    property_tax: "Property / land tax (Estimated)",
    service_charge: "Service charge / holding costs",
    disclaimer:
        "Disclaimer: Estimates only. Taxes/fees vary by buyer profile and local regulations. \
         This report is not financial advice.",
    note_gov:
        "Note: \"Government / Solicitor fees\" are estimated and may differ by city, \
         transaction type, and local rules.",
};

const ZH_LABELS: ReportLabels = ReportLabels {
    brand: BRAND,
    title: "全球房产投资计算器",
    country: "国家",
    currency: "币种",
    estimate_tag: "预估",
    investment_title: "预估现金回报率（Cash-on-Cash ROI）",
    net_yield: "净回报率（按房价）",
    net_annual_rent: "年度净租金",
    upfront_costs: "一次性成本合计",
    gross_annual_rent: "年度总租金",
    agent_fee_annual: "租房中介费（年度）",
    holding_annual: "年度持有成本",
    interest_annual: "年度利息成本",
    loan_amount: "贷款额",
    cash_deposit: "首付现金",
    breakdown: "成本明细",
    stamp_duty: "印花税/过户税",
    gov_fees: "政府/律师等费用（预估）",
    other_one_off_costs: "其他一次性费用",
    annual_cashflow: "年度现金流",
    sensitivity: "敏感性分析（租金 vs 利率）",
    sensitivity_hint: "表格显示：租金变化 × 利率变化下的现金回报率（只算利息）。",
    owner_title: "预估支出（自住）",
    annual_fixed: "年度固定支出",
    per_month: "折合每月",
    first_year: "第一年总支出（固定 + 一次性）",
    council_tax: "市政税/地方税（预估）",
    utilities: "水电煤网费（预估）",
    property_tax: "房产税/土地税（预估）",
    service_charge: "物业费/持有成本",
    disclaimer: "免责声明：仅为估算。税费随买家身份、城市、政策等变化。本报告不构成投资建议。",
    note_gov: "注：政府/律师等费用为预估值，可能因城市、交易类型、当地规则而不同。",
};

impl ReportLabels {
    pub fn for_lang(lang: Lang) -> Self {
        match lang {
            Lang::En => EN_LABELS,
            Lang::Zh => ZH_LABELS,
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Report metadata block.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub country_label: &'static str,
    pub currency: &'static str,
    /// Caller-supplied, preformatted generation timestamp
    pub generated_at: String,
    pub brand: &'static str,
    pub website: &'static str,
}

/// Display-ready strings for the one-off cost lines.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedOneOffCosts {
    pub purchase_tax: String,
    pub other_gov_fees: String,
    pub other_one_off_costs: String,
    pub upfront_costs: String,
}

/// Display-ready strings for the investment branch.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedInvestment {
    pub cash_on_cash_pct: String,
    pub net_yield_pct: String,
    pub net_annual_rent: String,
    pub gross_annual_rent: String,
    pub agent_fee_annual: String,
    pub holding_annual: String,
    pub loan_amount: String,
    pub cash_deposit: String,
    pub interest_annual: String,
}

/// Display-ready strings for the owner-occupied branch.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedOwnerOccupied {
    pub annual_council_tax: String,
    pub annual_utilities: String,
    pub annual_property_tax: String,
    pub annual_service_charge: String,
    pub annual_total_running_costs: String,
    pub monthly_running_costs: String,
    pub first_year_total_outgoings: String,
}

/// Display-ready strings for every output line, mirroring the result shape.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedResults {
    pub one_off_costs: FormattedOneOffCosts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment: Option<FormattedInvestment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_occupied: Option<FormattedOwnerOccupied>,
}

/// Everything the report renderer needs for one document.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub lang: Lang,
    pub country: Country,
    pub purpose: Purpose,
    pub currency: Currency,
    pub labels: ReportLabels,
    pub inputs: ValuationInput,
    pub results: ValuationOutput,
    pub formatted: FormattedResults,
    pub meta: ReportMeta,
}

/// Assemble the report payload from a computed valuation.
pub fn build_report_payload(
    input: &ValuationInput,
    results: &ValuationOutput,
    lang: Lang,
    generated_at: &str,
) -> ReportPayload {
    let one_off = &results.one_off_costs;
    let formatted = FormattedResults {
        one_off_costs: FormattedOneOffCosts {
            purchase_tax: fmt_money(one_off.purchase_tax),
            other_gov_fees: fmt_money(one_off.other_gov_fees),
            other_one_off_costs: fmt_money(one_off.other_one_off_costs),
            upfront_costs: fmt_money(one_off.upfront_costs),
        },
        investment: results.investment.as_ref().map(|inv| FormattedInvestment {
            cash_on_cash_pct: fmt_pct2(inv.cash_on_cash_pct),
            net_yield_pct: fmt_pct2(inv.net_yield_pct),
            net_annual_rent: fmt_money(inv.net_annual_rent),
            gross_annual_rent: fmt_money(inv.gross_annual_rent),
            agent_fee_annual: fmt_money(inv.agent_fee_annual),
            holding_annual: fmt_money(inv.annual_holding_costs),
            loan_amount: fmt_money(inv.financing.loan_amount),
            cash_deposit: fmt_money(inv.financing.cash_deposit),
            interest_annual: fmt_money(inv.financing.annual_interest_cost),
        }),
        owner_occupied: results
            .owner_occupied
            .as_ref()
            .map(|own| FormattedOwnerOccupied {
                annual_council_tax: fmt_money(own.annual_council_tax),
                annual_utilities: fmt_money(own.annual_utilities),
                annual_property_tax: fmt_money(own.annual_property_tax),
                annual_service_charge: fmt_money(own.annual_service_charge),
                annual_total_running_costs: fmt_money(own.annual_total_running_costs),
                monthly_running_costs: fmt_money(own.monthly_running_costs),
                first_year_total_outgoings: fmt_money(own.first_year_total_outgoings),
            }),
    };

    ReportPayload {
        lang,
        country: input.country,
        purpose: input.purpose,
        currency: results.currency,
        labels: ReportLabels::for_lang(lang),
        inputs: input.clone(),
        results: results.clone(),
        formatted,
        meta: ReportMeta {
            country_label: input.country.label(lang),
            currency: results.currency.code(),
            generated_at: generated_at.to_string(),
            brand: BRAND,
            website: WEBSITE,
        },
    }
}

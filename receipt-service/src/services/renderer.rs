//! Receipt markup rendering.
//!
//! Pure layout logic: the same model, profile and date label always produce
//! byte-identical markup. All user-controlled fields are escaped; the two
//! footer blocks and the extra-info block are administrator-trusted and
//! rendered verbatim.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::BusinessProfile;
use crate::models::ReceiptModel;
use crate::services::currency::format_amount;

const STYLE: &str = "<style>\n\
body { font-family: 'Open Sans', Arial, sans-serif; font-size: 12px; color: #333; }\n\
.pdf-container { padding: 24px; }\n\
.title-row p { line-height: 1.5; }\n\
.receipt-info { float: left; }\n\
.receipt-date { float: right; }\n\
.receipt-top-extra { clear: both; padding-top: 8px; }\n\
table { width: 100%; border-collapse: collapse; margin-top: 16px; }\n\
th { border-bottom: 1px solid #999; padding: 6px 4px; }\n\
td { padding: 4px; }\n\
.left-align { text-align: left; }\n\
.right-align { text-align: right; }\n\
.total-paid-td { border-top: 1px solid #999; }\n\
.test-marker { color: #c00; }\n\
.receipt-bottom, .receipt-footer { clear: both; margin-top: 24px; }\n\
</style>\n";

const SPACER_ROW: &str =
    "<tr>\n<td>&nbsp;</td>\n<td>&nbsp;</td>\n<td>&nbsp;</td>\n<td>&nbsp;</td>\n</tr>\n";

/// Label for the DATE PAID column, e.g. "Jan. 5, 2024".
pub fn date_paid_label(date: NaiveDate) -> String {
    format!("{}. {}, {}", date.format("%b"), date.day(), date.year())
}

/// Render a receipt into standalone HTML ready for document conversion.
pub fn render_receipt(
    model: &ReceiptModel,
    profile: &BusinessProfile,
    today_label: &str,
) -> String {
    let currency = model.currency_code.as_deref().unwrap_or("");
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{} Receipt</title>\n",
        escape_html(&profile.business_name)
    ));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n<div class=\"pdf-container\">\n");

    // Header: business identity
    html.push_str("<div class=\"row title-row\">\n<p>\n");
    if model.is_test_send {
        html.push_str("<strong><span class=\"test-marker\">TEST RECEIPT</span></strong><br/>\n");
    }
    html.push_str(&format!(
        "<strong>{}</strong><br/>\n",
        escape_html(&profile.business_name)
    ));
    html.push_str(&format!("{}<br/>\n", escape_html(&profile.business_address)));
    if let Some(id) = &profile.tax_id {
        let label = profile.tax_label.as_deref().unwrap_or("");
        html.push_str(&format!("{} {}\n", escape_html(label), escape_html(id)));
    }
    html.push_str("</p>\n</div>\n");

    // Member block on the left, payment date on the right
    html.push_str("<div class=\"row receipt-table\">\n<div class=\"receipt-top\">\n");
    html.push_str("<div class=\"receipt-info\">\n");
    html.push_str(&format!(
        "<div><strong>MEMBER ID:</strong> {}</div>\n<br/><br/>\n",
        escape_html(&model.member_id)
    ));
    match &model.extra_info {
        Some(extra_info) => {
            html.push_str(&format!("<div>{}</div>\n", extra_info));
        }
        None => {
            html.push_str(&format!(
                "<div>{} {}</div>\n",
                escape_html(&model.first_name),
                escape_html(&model.last_name)
            ));
            html.push_str(&format!("<div>{}</div>\n", escape_html(&model.email)));
            html.push_str(&format!(
                "<div>{}</div>\n",
                escape_html(model.address1.as_deref().unwrap_or(""))
            ));
            if let Some(address2) = &model.address2 {
                html.push_str(&format!("<div>{}</div>\n", escape_html(address2)));
            }
            html.push_str(&format!("<div>{}</div>\n", locality_line(model)));
        }
    }
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<div class=\"receipt-date\">\n<div><strong>DATE PAID:</strong> {}</div>\n</div>\n",
        escape_html(today_label)
    ));
    html.push_str("</div>\n");

    if !currency.is_empty() {
        html.push_str(&format!(
            "<div class=\"receipt-top-extra\">\n<p><em>All prices in {}</em></p>\n</div>\n",
            escape_html(currency)
        ));
    }

    // Line-item table
    html.push_str(
        "<table>\n<thead>\n<tr>\n<th class=\"left-align\">Service Description</th>\n\
         <th class=\"right-align\">Order #</th>\n<th></th>\n\
         <th class=\"right-align\">Amount</th>\n</tr>\n</thead>\n<tbody>\n",
    );
    html.push_str(&format!(
        "<tr>\n<td>{}</td>\n<td class=\"right-align\">{}</td>\n\
         <td class=\"right-align\">Subtotal</td>\n<td class=\"right-align\">{}</td>\n</tr>\n",
        escape_html(&model.product_name),
        escape_html(&model.order_number),
        format_amount(model.subtotal, currency),
    ));
    if let Some(shipping) = model.shipping {
        if shipping > Decimal::ZERO {
            html.push_str(&optional_row("Shipping", shipping, currency));
        }
    }
    if let Some(discount) = model.discount {
        if discount > Decimal::ZERO {
            html.push_str(&optional_row("Discount", discount, currency));
        }
    }
    html.push_str(SPACER_ROW);
    html.push_str(&format!(
        "<tr>\n<td></td>\n<td></td>\n\
         <td class=\"total-paid-td right-align first\"><strong>TOTAL PAID</strong></td>\n\
         <td class=\"total-paid-td right-align\"><strong>{}</strong></td>\n</tr>\n",
        format_amount(model.total, currency),
    ));
    html.push_str(SPACER_ROW);
    html.push_str("</tbody>\n</table>\n</div>\n");

    // Configured footer blocks, rendered verbatim
    html.push_str(&format!(
        "<div class=\"receipt-bottom\">\n{}\n</div>\n",
        profile.footer_section_1
    ));
    html.push_str(&format!(
        "<div class=\"receipt-footer\">\n{}\n</div>\n",
        profile.footer_section_2
    ));

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn optional_row(label: &str, amount: Decimal, currency: &str) -> String {
    format!(
        "<tr>\n<td></td>\n<td></td>\n<td class=\"right-align\">{}</td>\n\
         <td class=\"right-align\">{}</td>\n</tr>\n",
        label,
        format_amount(Some(amount), currency),
    )
}

/// City/state/zip line. The comma appears only when both city and state are
/// present, and the zip is shown only when address line 1 is present.
fn locality_line(model: &ReceiptModel) -> String {
    let city = model.city.as_deref().unwrap_or("");
    let state = model.state.as_deref().unwrap_or("");
    let comma = if !city.is_empty() && !state.is_empty() { "," } else { "" };
    let zip = if model.address1.is_some() {
        model.zip.as_deref().unwrap_or("")
    } else {
        ""
    };
    format!(
        "{} {} {} {}",
        escape_html(city),
        comma,
        escape_html(state),
        escape_html(zip)
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

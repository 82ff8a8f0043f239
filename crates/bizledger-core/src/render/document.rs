//! Render-ready view of an invoice shared by the HTML and PDF renderers.

use rust_decimal::Decimal;

use super::assets::AssetRef;
use super::format::{format_date, format_money, format_number};
use super::RenderOptions;
use crate::models::invoice::{Invoice, InvoiceType};

/// Column headings of the line-item table.
pub const COLUMNS: [&str; 6] = ["#", "Description", "Qty", "Rate", "Tax %", "Amount"];

/// One side of the From/To block.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyBlock {
    pub heading: &'static str,
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Labelled value in the metadata strip.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaField {
    pub label: &'static str,
    pub value: String,
}

/// One table row; every cell is already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub index: usize,
    pub description: String,
    pub quantity: String,
    pub rate: String,
    pub tax_percent: String,
    pub amount: String,
}

/// One line of the totals block.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalLine {
    pub label: &'static str,
    pub value: String,
    /// Printed in bold.
    pub emphasis: bool,
}

/// Everything a renderer prints, as display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub title: String,
    pub business_name: String,
    pub document_number: String,
    pub from: PartyBlock,
    pub to: PartyBlock,
    pub meta: Vec<MetaField>,
    /// Lower-case status, used for styling.
    pub status_class: String,
    pub rows: Vec<DocumentRow>,
    pub totals: Vec<TotalLine>,
    pub notes: String,
    pub signature: Option<AssetRef>,
    pub attachments: Vec<AssetRef>,
    pub footer: String,
}

impl InvoiceDocument {
    /// Shape `invoice`, prefixing amounts with its currency symbol.
    pub fn build(invoice: &Invoice, options: &RenderOptions) -> Self {
        let header = &invoice.header;
        let config = &options.config;
        let symbol = header.currency_symbol.as_str();
        let money = |value: Decimal| format_money(symbol, value, config.group_thousands);

        let business = PartyBlock {
            heading: "",
            name: header.business_name.clone(),
            address: header.business_address.clone().unwrap_or_default(),
            phone: header.business_phone.clone().unwrap_or_default(),
        };
        let party = PartyBlock {
            heading: "",
            name: header.party_name.clone(),
            address: header.party_address.clone().unwrap_or_default(),
            phone: header.party_phone.clone().unwrap_or_default(),
        };
        let (from, to) = match header.invoice_type {
            InvoiceType::Sale => (business, party),
            InvoiceType::Purchase => (party, business),
        };

        let title = match header.invoice_type {
            InvoiceType::Sale => config.sale_title.clone(),
            InvoiceType::Purchase => config.purchase_title.clone(),
        };

        let meta = vec![
            MetaField {
                label: "Date",
                value: format_date(header.date, &config.date_format),
            },
            MetaField {
                label: "Due Date",
                value: header
                    .due_date
                    .map(|d| format_date(d, &config.date_format))
                    .unwrap_or_default(),
            },
            MetaField {
                label: "Status",
                value: header.status.label().to_string(),
            },
        ];

        let rows = invoice
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| DocumentRow {
                index: i + 1,
                description: item.name.clone(),
                quantity: if item.unit.is_empty() {
                    format_number(item.quantity)
                } else {
                    format!("{} {}", format_number(item.quantity), item.unit)
                },
                rate: money(item.rate),
                tax_percent: format!("{}%", format_number(item.tax_percent)),
                amount: money(item.amount),
            })
            .collect();

        let t = &invoice.totals;
        let mut totals = vec![
            TotalLine {
                label: "Subtotal",
                value: money(t.subtotal),
                emphasis: false,
            },
            TotalLine {
                label: "Tax",
                value: money(t.tax_amount),
                emphasis: false,
            },
        ];
        if !t.discount_amount.is_zero() {
            totals.push(TotalLine {
                label: "Discount",
                value: format!("-{}", money(t.discount_amount)),
                emphasis: false,
            });
        }
        totals.push(TotalLine {
            label: "Total",
            value: money(t.total_amount),
            emphasis: true,
        });
        if !t.paid_amount.is_zero() {
            totals.push(TotalLine {
                label: "Paid",
                value: money(t.paid_amount),
                emphasis: false,
            });
            totals.push(TotalLine {
                label: "Balance Due",
                value: money(t.balance_amount),
                emphasis: true,
            });
        }

        Self {
            title,
            business_name: header.business_name.clone(),
            document_number: header.invoice_number.clone(),
            from: PartyBlock { heading: "From", ..from },
            to: PartyBlock { heading: "To", ..to },
            meta,
            status_class: header.status.label().to_lowercase(),
            rows,
            totals,
            notes: header.notes.clone().unwrap_or_default(),
            signature: options.assets.signature.clone(),
            attachments: options.assets.attachments.clone(),
            footer: format!(
                "Generated on {}",
                options.generated_at.format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::RenderConfig;
    use crate::render::fixtures;
    use pretty_assertions::assert_eq;

    fn options() -> RenderOptions {
        RenderOptions::new(RenderConfig::default(), fixtures::generated_at())
    }

    #[test]
    fn test_sale_document_shape() {
        let invoice = fixtures::invoice(2);
        let doc = InvoiceDocument::build(&invoice, &options());

        assert_eq!(doc.title, "Sales Invoice");
        assert_eq!(doc.from.heading, "From");
        assert_eq!(doc.from.name, "Corner Store");
        assert_eq!(doc.to.name, "Acme Traders");
        assert_eq!(doc.to.address, "");
        assert_eq!(doc.meta[0].value, "10 Jan 2024");
        assert_eq!(doc.meta[1].value, "");
        assert_eq!(doc.meta[2].value, "UNPAID");

        assert_eq!(
            doc.rows[0],
            DocumentRow {
                index: 1,
                description: "Item 1".to_string(),
                quantity: "2 pcs".to_string(),
                rate: "$50.00".to_string(),
                tax_percent: "5%".to_string(),
                amount: "$100.00".to_string(),
            }
        );

        let labels: Vec<&str> = doc.totals.iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["Subtotal", "Tax", "Total"]);
        assert_eq!(doc.totals[2].value, "$210.00");
        assert_eq!(doc.footer, "Generated on 2024-02-01 09:30:00");
    }

    #[test]
    fn test_purchase_swaps_parties_and_shows_optional_totals() {
        let mut invoice = fixtures::invoice(1);
        invoice.header.invoice_type = InvoiceType::Purchase;
        invoice.totals.discount_amount = Decimal::from(5);
        invoice.totals.total_amount = Decimal::from(100);
        invoice.totals.paid_amount = Decimal::from(40);
        invoice.totals.balance_amount = Decimal::from(60);

        let doc = InvoiceDocument::build(&invoice, &options());

        assert_eq!(doc.title, "Purchase Invoice");
        assert_eq!(doc.from.name, "Acme Traders");
        assert_eq!(doc.to.name, "Corner Store");

        let lines: Vec<(&str, &str)> = doc
            .totals
            .iter()
            .map(|t| (t.label, t.value.as_str()))
            .collect();
        assert_eq!(
            lines,
            vec![
                ("Subtotal", "$100.00"),
                ("Tax", "$5.00"),
                ("Discount", "-$5.00"),
                ("Total", "$100.00"),
                ("Paid", "$40.00"),
                ("Balance Due", "$60.00"),
            ]
        );
    }

    #[test]
    fn test_rows_display_stored_amounts() {
        let mut invoice = fixtures::invoice(1);
        invoice.items[0].amount = Decimal::from(999);

        let doc = InvoiceDocument::build(&invoice, &options());
        assert_eq!(doc.rows[0].amount, "$999.00");
    }
}

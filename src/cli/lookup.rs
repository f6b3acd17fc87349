use super::ui;
use crate::gateway::{LookupResponse, RequestGateway};
use anyhow::{Context, Result, bail};

impl LookupResponse {
    pub fn display_as_table(&self) -> String {
        match self {
            LookupResponse::Success {
                balance,
                transaction_count,
                usd_value,
                currency_symbol,
                address,
                address_type,
            } => {
                let mut table = ui::new_styled_table();
                table.add_row(vec![ui::label_cell("Type"), ui::value_cell(address_type.clone())]);
                table.add_row(vec![
                    ui::label_cell("Balance"),
                    ui::value_cell(format!("{balance:.8} {currency_symbol}")),
                ]);
                table.add_row(vec![
                    ui::label_cell("Transactions"),
                    ui::value_cell(transaction_count.to_string()),
                ]);
                table.add_row(vec![
                    ui::label_cell("USD Value"),
                    ui::highlight_cell(format!("${usd_value:.2}")),
                ]);

                format!(
                    "Address: {}\n\n{}",
                    ui::style_text(address, ui::StyleType::Title),
                    table
                )
            }
            LookupResponse::Error {
                message, address, ..
            } => format!(
                "Address: {}\n\n{}",
                ui::style_text(address, ui::StyleType::Title),
                ui::style_text(message, ui::StyleType::Error)
            ),
        }
    }
}

/// Looks up one address and prints the result. Fails when the lookup did.
pub async fn run(gateway: &RequestGateway, address: &str, address_type: &str, json: bool) -> Result<()> {
    let spinner = ui::new_spinner(&ui::style_text("Loading balance...", ui::StyleType::Subtle));
    let response = gateway.lookup(address, address_type).await;
    spinner.finish_and_clear();

    if json {
        let line = serde_json::to_string(&response).context("Failed to serialize response")?;
        println!("{line}");
    } else {
        println!("{}", response.display_as_table());
    }

    if let LookupResponse::Error { message, .. } = response {
        bail!("Lookup failed: {message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_table_contains_values() {
        let response = LookupResponse::Success {
            balance: 5.0,
            transaction_count: 3,
            usd_value: 325_000.0,
            currency_symbol: "BTC".to_string(),
            address: "1A1zP1".to_string(),
            address_type: "bitcoin".to_string(),
        };

        let output = console::strip_ansi_codes(&response.display_as_table()).to_string();
        assert!(output.contains("1A1zP1"));
        assert!(output.contains("5.00000000 BTC"));
        assert!(output.contains("$325000.00"));
        assert!(output.contains("Transactions"));
    }

    #[test]
    fn test_error_display_shows_message() {
        let response = LookupResponse::Error {
            message: "Request for 1A1zP1 timed out.".to_string(),
            address: "1A1zP1".to_string(),
            address_type: "bitcoin".to_string(),
            kind: None,
        };

        let output = console::strip_ansi_codes(&response.display_as_table()).to_string();
        assert!(output.contains("Request for 1A1zP1 timed out."));
    }
}

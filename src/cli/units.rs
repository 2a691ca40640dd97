use super::ui;
use crate::core::{BasketItem, CryptoId, FiatCode, Unit, UnitClass};
use comfy_table::{Cell, Table};

/// Fiat codes offered by default. Any other 3-letter code works too.
pub const COMMON_FIAT: [&str; 6] = ["USD", "EUR", "GBP", "INR", "AUD", "CAD"];

pub fn supported_units() -> Vec<Unit> {
    let fiat = COMMON_FIAT
        .iter()
        .filter_map(|code| code.parse::<FiatCode>().ok())
        .map(Unit::Fiat);
    let crypto = CryptoId::ALL.into_iter().map(Unit::Crypto);
    let basket = BasketItem::ALL.into_iter().map(Unit::Basket);
    fiat.chain(crypto).chain(basket).collect()
}

pub fn units_table() -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Unit"),
        ui::header_cell("Kind"),
        ui::header_cell("Price (USD)"),
    ]);

    for unit in supported_units() {
        let price = match &unit {
            Unit::Basket(item) => Some(item.usd_price()),
            _ => None,
        };
        table.add_row(vec![
            Cell::new(unit.to_string()),
            Cell::new(unit.class().to_string()),
            ui::format_optional_cell(price, |p| format!("{p:.2}")),
        ]);
    }
    table
}

pub fn run() {
    println!(
        "{}\n\n{}",
        ui::style_text("Supported units", ui::StyleType::Title),
        units_table()
    );
    println!(
        "\n{}",
        ui::style_text(
            &format!(
                "{} codes other than the ones listed are passed through to the rate API.",
                UnitClass::Fiat
            ),
            ui::StyleType::Subtle
        )
    );
}

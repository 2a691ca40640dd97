use super::ui;
use crate::core::Converter;
use anyhow::Result;

pub async fn run(converter: &Converter, amount: &str, from: &str, to: &str) -> Result<()> {
    let pb = ui::new_spinner("Fetching rates...");
    let result = converter.convert_display(amount, from, to).await;
    pb.finish_and_clear();

    let line = result?;
    println!("{}", ui::style_text(&line, ui::StyleType::ResultValue));
    Ok(())
}

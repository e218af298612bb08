//! Reagent display formatting

use crate::models::Reagent;

/// Format a list of reagents as a table
pub fn format_reagent_list(reagents: &[Reagent]) -> String {
    if reagents.is_empty() {
        return "No reagents found.".to_string();
    }

    let name_width = reagents
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(4)
        .max(4);
    let catalog_width = reagents
        .iter()
        .map(|r| r.catalog_number.len())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<catalog_width$}  {:<12}  {:<40}\n",
        "Name",
        "Catalog",
        "Supplier",
        "ID",
        name_width = name_width,
        catalog_width = catalog_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<catalog_width$}  {:-<12}  {:-<40}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
        catalog_width = catalog_width,
    ));

    for reagent in reagents {
        output.push_str(&format!(
            "{:<name_width$}  {:<catalog_width$}  {:<12}  {}\n",
            reagent.name,
            reagent.catalog_number,
            reagent.supplier,
            reagent.id,
            name_width = name_width,
            catalog_width = catalog_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reagent_list() {
        let mut reagent = Reagent::new("Taq polymerase");
        reagent.catalog_number = "EP0402".to_string();
        reagent.supplier = "Thermo".to_string();

        let output = format_reagent_list(&[reagent]);
        assert!(output.contains("Taq polymerase"));
        assert!(output.contains("EP0402"));
        assert!(output.contains("rgt-"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_reagent_list(&[]).contains("No reagents found"));
    }
}

use verda_core::catalog::CatalogFile;
use verda_core::Recognition;

pub fn print_recognition(result: &Recognition) {
    println!("=== {} ===\n", result.name);
    println!("  Category:       {}", result.category);
    println!(
        "  Eco score:      {} / 100  (catalog {}, CO2 {})",
        result.eco_score, result.catalog_eco_score, result.co2_score
    );
    println!("  CO2 impact:     {} g", result.co2_gram);
    println!("  Recyclability:  {}", result.recyclability);
    println!(
        "  Match:          {} (coverage {:.3})",
        result.catalog_match_strategy, result.catalog_coverage
    );
    println!("  Confidence:     {:.3}", result.confidence);
    if result.catalog_auto_learned {
        println!("  Auto-learned:   yes");
    }
    if result.greener_alternative_boost_applied {
        println!(
            "  Greener pick:   yes (+{} boost)",
            result.greener_alternative_boost
        );
    }
    println!();
    println!("  {}", result.alt_recommendation);
    if result.explanation != result.alt_recommendation {
        println!("\n  {}", result.explanation);
    }

    if !result.score_factors.is_empty() {
        println!("\n  Score breakdown:");
        let max_label = result
            .score_factors
            .iter()
            .map(|f| f.label.len())
            .max()
            .unwrap_or(10);
        for factor in &result.score_factors {
            println!(
                "    {:<width$}  {:>7.2}",
                factor.label,
                factor.delta,
                width = max_label
            );
        }
        println!(
            "    {:<width$}  {:>7.2}  (clamped to {})",
            "Total",
            result.pre_boost_score + result.greener_alternative_boost as f64,
            result.eco_score,
            width = max_label
        );
    }
    println!();
}

pub fn print_catalog(catalog: &CatalogFile) {
    println!("{} (v{})\n", catalog.name, catalog.version);
    if let Some(ref description) = catalog.description {
        println!("{description}\n");
    }

    let max_name = catalog
        .entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(10);

    println!(
        "  {:<width$}  {:<20}  {:>5}  {:>10}  {}",
        "Name",
        "Category",
        "Score",
        "CO2 (g)",
        "Recyclability",
        width = max_name
    );
    for entry in &catalog.entries {
        let score = entry
            .catalog_eco_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let carbon = entry
            .carbon_impact_gram
            .map(|c| format!("{c:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<width$}  {:<20}  {:>5}  {:>10}  {}",
            entry.name,
            entry.category,
            score,
            carbon,
            entry.recyclability,
            width = max_name
        );
    }
    println!("\n  {} entries", catalog.entries.len());
}

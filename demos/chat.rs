use financial_insights::{DatasetPreparer, InsightsConfig};
use std::error::Error;
use std::io::{self, Write};

fn load_config() -> Result<InsightsConfig, Box<dyn Error>> {
    match std::env::var("INSIGHTS_CONFIG") {
        Ok(path) => Ok(InsightsConfig::from_json_file(path)?),
        Err(_) => Ok(InsightsConfig {
            data_path: std::env::var("INSIGHTS_DATA")
                .unwrap_or_else(|_| "demos/financial_data.csv".to_string())
                .into(),
        }),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("💰 Financial Insights Chatbot\n");
    println!("Ask about Microsoft, Tesla or Apple: total revenue, net income, total assets,");
    println!("total liabilities, cash flow from operating activities, or their growth rates.");
    println!("Years 2022 to 2024 are supported.\n");
    println!("💡 Examples:");
    println!("  - What is Apple's revenue for 2022?");
    println!("  - Tell me about Microsoft's net income growth.");
    println!("  - Summarise Tesla's performance for 2023.\n");

    let config = load_config()?;
    let dataset = match DatasetPreparer::load(&config.data_path) {
        Ok(dataset) if !dataset.is_empty() => dataset,
        Ok(_) => {
            eprintln!("⚠️ '{}' contains no usable rows.", config.data_path.display());
            return Ok(());
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(());
        }
    };
    println!("✅ Loaded {} records. Type 'quit' to exit.", dataset.len());
    println!("------------------------------------------------------------------");

    let mut session = financial_insights::ChatSession::new(&dataset)?;

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let query = input.trim();

        if query.eq_ignore_ascii_case("quit") || query.eq_ignore_ascii_case("exit") {
            break;
        }

        if query.is_empty() {
            continue;
        }

        println!("\n{}\n", session.ask(query));
        println!("------------------------------------------------------------------");
    }

    if let Ok(path) = std::env::var("INSIGHTS_TRANSCRIPT") {
        std::fs::write(&path, session.transcript_json()?)?;
        println!("📝 Transcript saved to {}", path);
    }

    Ok(())
}

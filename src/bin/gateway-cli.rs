use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Query a running transit gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search bus lines by terms (line number or name)
    Search { terms: String },
    /// Arrival forecast for a line code
    Forecast { line_code: String },
    /// Send a CORS preflight and show the returned headers
    Preflight,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Search { terms } => {
            let res = client
                .get(&cli.url)
                .query(&[("operation", "buscar"), ("termosBusca", terms.as_str())])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Forecast { line_code } => {
            let res = client
                .get(&cli.url)
                .query(&[("operation", "previsao"), ("codigoLinha", line_code.as_str())])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Preflight => {
            let res = client.request(Method::OPTIONS, &cli.url).send().await?;
            println!("Status: {}", res.status());
            for (name, value) in res.headers() {
                println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

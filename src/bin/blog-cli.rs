use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "blog-cli")]
#[command(about = "Management CLI for the blog server", long_about = None)]
struct Cli {
    /// Base URL of the blog server.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key.
    #[arg(short, long, default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    /// Admin path prefix.
    #[arg(long, default_value = "/admin")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reload phase, live generation and last failure
    Status,
    /// List tags, or show one tag in detail
    Tags { slug: Option<String> },
    /// List series
    Series,
    /// List registered feed routes
    Routes,
    /// Trigger a reload through the admin API
    Reload,
    /// Trigger a reload through the public webhook
    Webhook {
        #[arg(long, default_value = "/webhooks/reload")]
        path: String,
        /// Value for the X-Webhook-Secret header
        #[arg(long)]
        secret: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');
    let admin = format!("{}{}", base, cli.prefix.trim_end_matches('/'));

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let res = match cli.command {
        Commands::Status => client.get(format!("{admin}/status")).headers(headers).send().await?,
        Commands::Tags { slug: None } => client.get(format!("{admin}/tags")).headers(headers).send().await?,
        Commands::Tags { slug: Some(slug) } => {
            client.get(format!("{admin}/tags/{slug}")).headers(headers).send().await?
        }
        Commands::Series => client.get(format!("{admin}/series")).headers(headers).send().await?,
        Commands::Routes => client.get(format!("{admin}/routes")).headers(headers).send().await?,
        Commands::Reload => client.post(format!("{admin}/reload")).headers(headers).send().await?,
        Commands::Webhook { path, secret } => {
            let mut req = client.post(format!("{base}{path}"));
            if let Some(secret) = secret {
                req = req.header("X-Webhook-Secret", secret);
            }
            req.send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

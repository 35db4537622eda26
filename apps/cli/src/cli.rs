//! コマンドライン引数の定義

use clap::{Parser, Subcommand};
use tollgate_client::HttpMethod;

#[derive(Debug, Parser)]
#[command(name = "tollgate")]
#[command(about = "Tollgate backend client: auth, payments, user profiles and raw API requests")]
#[command(version)]
pub struct Cli {
   #[command(subcommand)]
   pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
   /// Authenticate with email and password
   Login {
      #[arg(long)]
      email:    String,
      #[arg(long, env = "TOLLGATE_PASSWORD", hide_env_values = true)]
      password: String,
   },
   /// Exchange a token for a fresh one
   Refresh {
      #[arg(long, env = "TOLLGATE_TOKEN", hide_env_values = true)]
      token: String,
   },
   /// Process a payment
   Pay {
      #[arg(long)]
      user_id:  String,
      #[arg(long, allow_negative_numbers = true)]
      amount:   f64,
      #[arg(long, default_value = "USD")]
      currency: String,
   },
   /// Refund a payment
   Refund {
      #[arg(long)]
      payment_id: String,
   },
   /// Fetch a user profile (retried with the configured policy)
   Profile {
      #[arg(long)]
      user_id: String,
   },
   /// Partially update a user profile
   UpdateProfile {
      #[arg(long)]
      user_id:     String,
      #[arg(long)]
      name:        Option<String>,
      #[arg(long)]
      email:       Option<String>,
      /// Preferences as a JSON object
      #[arg(long)]
      preferences: Option<String>,
   },
   /// Send an arbitrary request through the middleware pipeline
   Request {
      #[arg(long, value_parser = parse_method, default_value = "GET")]
      method:   HttpMethod,
      #[arg(long)]
      endpoint: String,
      /// JSON body
      #[arg(long)]
      body:     Option<String>,
      /// Extra header as `Name: value` (repeatable)
      #[arg(long = "header", value_parser = parse_header)]
      headers:  Vec<(String, String)>,
      /// Bearer token added by the auth middleware
      #[arg(long, env = "TOLLGATE_TOKEN", hide_env_values = true)]
      bearer:   Option<String>,
   },
   /// Compute the processing fee for an amount
   Fee {
      #[arg(long, allow_negative_numbers = true)]
      amount: f64,
   },
   /// Check whether an email address is well formed
   ValidateEmail {
      #[arg(long)]
      email: String,
   },
   /// Format an amount as currency (en-US)
   FormatCurrency {
      #[arg(long, allow_negative_numbers = true)]
      amount:   f64,
      #[arg(long, default_value = "USD")]
      currency: String,
   },
}

fn parse_method(value: &str) -> Result<HttpMethod, String> {
   match value.to_ascii_uppercase().as_str() {
      "GET" => Ok(HttpMethod::Get),
      "POST" => Ok(HttpMethod::Post),
      "PUT" => Ok(HttpMethod::Put),
      "DELETE" => Ok(HttpMethod::Delete),
      other => Err(format!("unsupported method: {other}")),
   }
}

fn parse_header(value: &str) -> Result<(String, String), String> {
   let (name, header_value) = value
      .split_once(':')
      .ok_or_else(|| format!("expected `Name: value`, got {value:?}"))?;
   let name = name.trim();
   if name.is_empty() {
      return Err(format!("header name is empty in {value:?}"));
   }
   Ok((name.to_string(), header_value.trim().to_string()))
}

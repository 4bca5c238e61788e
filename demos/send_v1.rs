use std::io;

use opilo::{Account, V1Client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = required_env("OPILO_USERNAME")?;
    let password = required_env("OPILO_PASSWORD")?;
    let from = required_env("OPILO_FROM")?;
    let to = required_env("OPILO_TO")?;
    let text = std::env::var("OPILO_TEXT").unwrap_or_else(|_| "Hello from API v1.".to_owned());

    let client = V1Client::new(Account::new(username, password)?)?;
    let recipients = to.split(',').map(str::trim).collect::<Vec<_>>();

    let body = client.send(from, recipients, text).await?;
    println!("httpsend: {body}");

    Ok(())
}

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

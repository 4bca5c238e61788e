use std::io;

use opilo::{Account, OpiloClientBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = required_env("OPILO_USERNAME")?;
    let password = required_env("OPILO_PASSWORD")?;

    let mut builder = OpiloClientBuilder::new(Account::new(username, password)?);
    if let Ok(base_url) = std::env::var("OPILO_URL") {
        builder = builder.base_url(base_url);
    }
    let gateway = builder.build()?;

    let credit = gateway.get_credit().await?;
    println!("sms pages left: {}", credit.sms_page_count);

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

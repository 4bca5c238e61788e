use std::io;

use opilo::{Account, CheckStatus, SmsId, V2Client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = required_env("OPILO_USERNAME")?;
    let password = required_env("OPILO_PASSWORD")?;
    let ids = required_env("OPILO_IDS")?
        .split(',')
        .map(|raw| raw.trim().parse::<u64>().map(SmsId::new))
        .collect::<Result<Vec<_>, _>>()?;

    let client = V2Client::new(Account::new(username, password)?)?;
    let response = client.check_status(CheckStatus::new(ids)?).await?;

    for (id, status) in &response.statuses {
        println!("{id}: {status:?}");
    }

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

use std::io;

use opilo::{Account, CheckInbox, ReadFilter, TIMESTAMP_FORMAT, V2Client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = required_env("OPILO_USERNAME")?;
    let password = required_env("OPILO_PASSWORD")?;
    let min_id = std::env::var("OPILO_MIN_ID")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or_default();

    let client = V2Client::new(Account::new(username, password)?)?;
    let options = CheckInbox {
        min_id,
        read: ReadFilter::NotRead,
        ..Default::default()
    };

    let inbox = client.check_inbox(options).await?;
    for sms in inbox.messages() {
        println!(
            "#{} {} -> {} at {}: {}",
            sms.opilo_id(),
            sms.from(),
            sms.to(),
            sms.received_at().format(TIMESTAMP_FORMAT),
            sms.text()
        );
    }
    if let Some(last) = inbox.last_id() {
        println!("next poll: OPILO_MIN_ID={}", last.get() + 1);
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

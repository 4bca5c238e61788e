use std::io;

use opilo::{Account, OutgoingSms, SendResult, SendSms, V2Client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = required_env("OPILO_USERNAME")?;
    let password = required_env("OPILO_PASSWORD")?;
    let from = required_env("OPILO_FROM")?;
    let to = required_env("OPILO_TO")?;
    let text =
        std::env::var("OPILO_TEXT").unwrap_or_else(|_| "Hello from the opilo demo.".to_owned());

    let client = V2Client::new(Account::new(username, password)?)?;
    let sms = OutgoingSms::new(from, to, text)?;

    let response = client.send_sms(SendSms::one(sms)).await?;
    for result in response.items().unwrap_or_default() {
        match result {
            SendResult::Sent(id) => println!("queued: {id}"),
            SendResult::Failed(err) => println!("rejected: {} (code {:?})", err.message, err.code),
        }
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

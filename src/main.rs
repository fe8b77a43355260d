use anyhow::Context;
use deepwaters_client::core::config::ExchangeConfig;
use deepwaters_client::core::traits::{AccountInfo, OrderPlacer};
use deepwaters_client::{build_deepwaters_connector, OrderSide, SwapRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Reads DEEPWATERS_PRIVATE_KEY and friends
    #[cfg(feature = "env-file")]
    let config = ExchangeConfig::from_env_file("DEEPWATERS");
    #[cfg(not(feature = "env-file"))]
    let config = ExchangeConfig::from_env("DEEPWATERS");
    let config = config.context("failed to load DEEPWATERS_* configuration")?;

    let deepwaters = build_deepwaters_connector(config)?;
    println!("Customer: {}", deepwaters.customer());

    let nonce = deepwaters.get_nonce().await.context("nonce lookup failed")?;
    println!("Current nonce: {}", nonce);

    match deepwaters.get_account_balance().await {
        Ok(balances) => {
            for balance in &balances {
                // Amounts beyond Decimal's range print verbatim
                match balance.decimal_amount() {
                    Some(amount) => println!("Balance: {} {}", amount.normalize(), balance.asset),
                    None => println!("Balance: {} {}", balance.amount, balance.asset),
                }
            }
        }
        Err(e) => {
            println!("Error fetching balances: {}", e);
        }
    }

    // Order placement is opt-in
    let place_order = std::env::var("DEEPWATERS_PLACE_ORDER").is_ok_and(|value| value == "true");
    if !place_order {
        println!("Set DEEPWATERS_PLACE_ORDER=true to submit the example order");
        return Ok(());
    }

    let order = SwapRequest::limit(
        "WETH.GOERLI.5.TESTNET.PROD",
        "USDC.GOERLI.5.TESTNET.PROD",
        OrderSide::Buy,
        "0.0447",
        "1250.09",
    );

    match deepwaters.swap(order).await {
        Ok(result) => {
            match result.venue_order_id {
                Some(id) => println!("Order {} returned status {}", id, result.status),
                None => println!("Order returned status {} without an id", result.status),
            }
        }
        Err(e) => {
            println!("Error placing order: {}", e);
        }
    }

    Ok(())
}

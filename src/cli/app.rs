use super::{Cli, Command};
use anyhow::{Context, Result, anyhow, bail};
use bidbook::view::{default_columns, render_checkout, render_table};
use bidbook::{CheckoutSession, Item, ItemId, Ledger, ReconciliationEngine, RemoteConfig, RemoteTableClient};
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    let config = RemoteConfig::from_env().context("Failed to read remote table configuration")?;
    info!("using {}", config.describe());

    let mut ledger = Ledger::connect(config)
        .await
        .context("Failed to load items from the remote table")?;

    let output = execute(&mut ledger, cli.command).await?;
    print!("{}", output);
    Ok(())
}

/// Run one command against a loaded engine and return what to print.
pub async fn execute<C: RemoteTableClient>(
    engine: &mut ReconciliationEngine<C>,
    command: Command,
) -> Result<String> {
    match command {
        Command::List { bidder } => {
            let items = match bidder {
                Some(bidder) => engine.store().select_by_bidder(bidder),
                None => engine.store().snapshot(),
            };
            Ok(render_table(&default_columns(), &items))
        }
        Command::Add {
            bid,
            item,
            description,
            price,
        } => {
            if price.is_some_and(|p| p < 0.0) {
                bail!("price cannot be negative");
            }
            let created = engine
                .create(&Item::pending(bid, item, description, price))
                .await
                .context("Failed to create item")?;
            Ok(format!(
                "created {}\n",
                created.id.map(|id| id.to_string()).unwrap_or_default()
            ))
        }
        Command::Edit {
            id,
            bid,
            item,
            description,
            price,
            clear_price,
            paid,
        } => {
            let id = ItemId::new(id);
            let mut edited = engine
                .store()
                .get(&id)
                .cloned()
                .ok_or_else(|| anyhow!("no item '{}'", id))?;

            if let Some(bid) = bid {
                edited.bid_number = bid;
            }
            if let Some(item) = item {
                edited.item_number = item;
            }
            if let Some(description) = description {
                edited.item_description = description;
            }
            if let Some(price) = price {
                if price < 0.0 {
                    bail!("price cannot be negative");
                }
                edited.price = Some(price);
            }
            if clear_price {
                edited.price = None;
            }
            if let Some(paid) = paid {
                edited.paid = paid;
            }

            engine.save(edited).await.context("Failed to save item")?;
            Ok(format!("saved {}\n", id))
        }
        Command::Delete { id } => {
            let id = ItemId::new(id);
            engine
                .delete_by_id(&id)
                .await
                .with_context(|| format!("Failed to delete '{}'", id))?;
            Ok(format!("deleted {}\n", id))
        }
        Command::Checkout {
            bidder,
            pay,
            pay_all,
            commit,
        } => {
            let mut session = CheckoutSession::open(engine.store(), bidder);
            if pay_all {
                session.mark_all_paid();
            }
            for id in pay {
                if !session.toggle_paid(&ItemId::new(id.as_str()), true) {
                    bail!("item '{}' does not belong to bidder {}", id, bidder);
                }
            }

            let mut output = render_checkout(&session);
            if commit && !session.is_empty() {
                session
                    .commit(engine)
                    .await
                    .context("Failed to save checkout")?;
                output.push_str("checkout saved\n");
            }
            Ok(output)
        }
    }
}

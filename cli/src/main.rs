use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use tracing::{info, Level};

use shopping_list_backend::domain::clock::SystemClock;
use shopping_list_backend::domain::models::ShoppingItem;
use shopping_list_backend::domain::voice::{self, Language};
use shopping_list_backend::io::{LlmClient, SuggestionProvider, SuggestionResponse, WebhookClient};
use shopping_list_backend::{
    AddItemCommand, JsonConnection, ShoppingListStore, SortOrder, UpdateBudgetCommand,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let data_dir = data_directory()?;
    info!("Using data directory {}", data_dir.display());
    let connection = Arc::new(JsonConnection::new(&data_dir)?);
    let mut store = ShoppingListStore::new(connection, Arc::new(SystemClock))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("list");

    match command {
        "add" => {
            let name = args.get(1).ok_or_else(|| anyhow!("usage: add <name> <price> [quantity]"))?;
            let price: f64 = args
                .get(2)
                .ok_or_else(|| anyhow!("usage: add <name> <price> [quantity]"))?
                .parse()?;
            let quantity: u32 = match args.get(3) {
                Some(raw) => raw.parse()?,
                None => 1,
            };
            let result =
                store.add_item(AddItemCommand::new(name, price).with_quantity(quantity))?;
            for notification in &result.notifications {
                println!("* {:?}", notification);
            }
        }
        "list" => {
            let order = match args.get(1).map(String::as_str) {
                Some("name") | None => SortOrder::Name,
                Some("price") => SortOrder::PriceAsc,
                Some("price-desc") => SortOrder::PriceDesc,
                Some("category") => SortOrder::Category,
                Some("date") => SortOrder::Date,
                Some(other) => bail!("unknown sort order '{}'", other),
            };
            for item in store.get_sorted_items(order) {
                if item.phantom {
                    continue;
                }
                print_item(&item);
            }
            println!("total: {:.2}", store.calculate_total(None));
        }
        "done" => {
            let id = args.get(1).ok_or_else(|| anyhow!("usage: done <item-id>"))?;
            match store.toggle_item_completion(id) {
                Some(true) => {
                    println!("completed");
                    if let Some(item) = store.items().iter().find(|i| &i.id == id) {
                        if let Some(suggestion) =
                            store.check_personalized_suggestions(&item.name.clone())
                        {
                            println!("you usually also buy: {}", suggestion);
                        }
                    }
                }
                Some(false) => println!("uncompleted"),
                None => bail!("no such item"),
            }
        }
        "remove" => {
            let id = args.get(1).ok_or_else(|| anyhow!("usage: remove <item-id>"))?;
            if !store.remove_item(id) {
                bail!("no such item");
            }
        }
        "quantity" => {
            let id = args.get(1).ok_or_else(|| anyhow!("usage: quantity <item-id> <n>"))?;
            let quantity: i64 = args
                .get(2)
                .ok_or_else(|| anyhow!("usage: quantity <item-id> <n>"))?
                .parse()?;
            if !store.update_item_quantity(id, quantity) {
                bail!("no such item");
            }
        }
        "clear" => match store.clear_all_items() {
            Some(entry_id) => println!("completed items saved to history entry {}", entry_id),
            None => println!("list cleared"),
        },
        "history" => {
            for entry in store.history() {
                println!(
                    "{}  {}  {} items  {:.2}",
                    entry.id,
                    entry.date.format("%Y-%m-%d"),
                    entry.items.len(),
                    entry.total_amount
                );
            }
        }
        "restore" => {
            let id = args.get(1).ok_or_else(|| anyhow!("usage: restore <entry-id>"))?;
            if !store.restore_list_from_history(id) {
                bail!("no such history entry");
            }
        }
        "budget" => match (args.get(1), args.get(2)) {
            (None, _) => {
                let budget = store.budget();
                if budget.enabled {
                    println!(
                        "budget {:.2}, warning at {}%",
                        budget.amount, budget.warning_threshold
                    );
                } else {
                    println!("budget disabled");
                }
            }
            (Some(raw), threshold) if raw != "off" => {
                let command = UpdateBudgetCommand {
                    enabled: Some(true),
                    amount: Some(raw.parse()?),
                    warning_threshold: match threshold {
                        Some(t) => Some(t.parse()?),
                        None => None,
                    },
                };
                store.update_budget(command)?;
            }
            _ => {
                store.update_budget(UpdateBudgetCommand {
                    enabled: Some(false),
                    ..Default::default()
                })?;
            }
        },
        "savings" => {
            for suggestion in store.get_saving_suggestions() {
                println!(
                    "{} ({:.2}) instead of {} ({:.2}): save {:.0}%",
                    suggestion.cheaper.name,
                    suggestion.cheaper.price,
                    suggestion.expensive.name,
                    suggestion.expensive.price,
                    suggestion.percent_savings
                );
            }
        }
        "priority" => {
            let max_budget: f64 = args
                .get(1)
                .ok_or_else(|| anyhow!("usage: priority <max-budget>"))?
                .parse()?;
            let split = store.get_priority_items(max_budget);
            for item in &split.within_budget {
                print_item(item);
            }
            if !split.outside_budget.is_empty() {
                println!("-- over budget --");
                for item in &split.outside_budget {
                    print_item(item);
                }
            }
        }
        "voice" => {
            let transcript = args[1..].join(" ");
            let language = Language::from_code(store.language()).unwrap_or(Language::English);
            match voice::parse_transcript(&transcript, language) {
                Some(parsed) => {
                    let price = parsed.price.unwrap_or(0.1);
                    let result = store.add_item(
                        AddItemCommand::new(&parsed.name, price).with_quantity(parsed.quantity),
                    )?;
                    for notification in &result.notifications {
                        println!("* {:?}", notification);
                    }
                }
                None => bail!("could not understand '{}'", transcript),
            }
        }
        "suggest" => {
            let prompt = args[1..].join(" ");
            if prompt.is_empty() {
                bail!("usage: suggest <prompt>");
            }
            let client = LlmClient::from_env()?;
            match client.suggest(&prompt, store.language()).await? {
                Some(SuggestionResponse::Items(items)) => {
                    for item in items {
                        println!("- {}", item.name);
                    }
                }
                Some(SuggestionResponse::Categories(map)) => {
                    for (category, names) in map {
                        println!("{}: {}", category, names.join(", "));
                    }
                }
                None => println!("no suggestions"),
            }
            if let Some(webhook) = WebhookClient::from_env()? {
                if let Some(recipe) = webhook
                    .send_event("suggestion_generated", &prompt, store.language())
                    .await
                {
                    println!("{}", recipe.description);
                    for ingredient in recipe.ingredients {
                        println!("- {}", ingredient);
                    }
                }
            }
        }
        "language" => {
            let code = args.get(1).ok_or_else(|| anyhow!("usage: language <en|es>"))?;
            store.set_language(code);
        }
        other => bail!("unknown command '{}'", other),
    }

    Ok(())
}

fn print_item(item: &ShoppingItem) {
    let mark = if item.completed { "x" } else { " " };
    println!(
        "[{}] {}  {} x{}  {:.2}  ({})",
        mark, item.id, item.name, item.quantity, item.price, item.category
    );
}

fn data_directory() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SHOPPING_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::data_dir().ok_or_else(|| anyhow!("no data directory available"))?;
    Ok(base.join("shopping-list"))
}

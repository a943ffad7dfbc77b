use super::{mutate, open, print_removed, remove};
use crate::output::{print_json, print_rows};
use chrono::NaiveDate;
use clap::Subcommand;
use route_core::entities::transaction::{self, Transaction, TransactionDraft, TransactionKind};
use route_core::entity::NumberInput;
use std::path::Path;

#[derive(Subcommand)]
pub enum SpendSubcommand {
    /// Record income or an expense
    Add {
        description: String,
        /// Amount; text that does not parse counts as 0
        #[arg(long)]
        amount: String,
        /// Income or Expense (default Expense)
        #[arg(long)]
        kind: Option<TransactionKind>,
        #[arg(long, default_value = "")]
        category: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List transactions
    List,
    /// Income, expense and net totals
    Summary,
    /// Remove a transaction
    Remove { id: String },
}

pub fn run(root: &Path, subcmd: SpendSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    match subcmd {
        SpendSubcommand::Add {
            description,
            amount,
            kind,
            category,
            date,
        } => {
            let draft = TransactionDraft {
                description,
                amount: NumberInput::from(amount.as_str()),
                category,
                kind,
                date,
            };
            let items =
                mutate::<Transaction, _>(store, |items| transaction::add_transaction(items, draft))?;
            let created = items.last().cloned();
            if json {
                print_json(&created)
            } else {
                if let Some(t) = created {
                    println!("Added {} [{}]: {} {:.2}", t.kind, t.id, t.description, t.amount);
                }
                Ok(())
            }
        }
        SpendSubcommand::List => {
            let items = store.hydrate::<Transaction>()?.items;
            if json {
                return print_json(&items);
            }
            let rows = items
                .iter()
                .map(|t| {
                    vec![
                        t.id.clone(),
                        t.date.to_string(),
                        t.kind.to_string(),
                        t.category.clone(),
                        t.description.clone(),
                        format!("{:.2}", t.signed()),
                    ]
                })
                .collect();
            print_rows(
                &["ID", "DATE", "KIND", "CATEGORY", "DESCRIPTION", "AMOUNT"],
                rows,
                "No transactions.",
            );
            Ok(())
        }
        SpendSubcommand::Summary => {
            let s = transaction::summary(&store.hydrate::<Transaction>()?.items);
            if json {
                print_json(&s)
            } else {
                println!("Income:  {:.2}", s.income);
                println!("Expense: {:.2}", s.expense);
                println!("Net:     {:.2}", s.net);
                Ok(())
            }
        }
        SpendSubcommand::Remove { id } => {
            remove::<Transaction>(store, &id)?;
            print_removed("transaction", &id, json)
        }
    }
}

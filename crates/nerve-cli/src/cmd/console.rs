use anyhow::{Context, Result};
use nerve_core::{Inbound, Responder};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::args::BotArgs;

const CONSOLE_CHANNEL: &str = "console";
const CONSOLE_AUTHOR: &str = "console";

pub fn run(bot: &BotArgs) -> Result<()> {
    let config = bot.config();
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let responder = Responder::from_config(&config);
        responder
            .store()
            .ensure_schema()
            .await
            .context("could not prepare the content store")?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let Some(msg) = parse_line(&line) else {
                continue;
            };
            for reply in responder.handle(&msg).await {
                println!("{}", reply.render_plain());
            }
        }
        Ok::<_, anyhow::Error>(())
    })
}

/// `name: text` speaks as `name`; anything else speaks as the console user.
fn parse_line(line: &str) -> Option<Inbound> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (author, content) = match line.split_once(':') {
        Some((name, rest)) if is_author_name(name) => (name.trim(), rest.trim()),
        _ => (CONSOLE_AUTHOR, line),
    };
    Some(Inbound::new(CONSOLE_CHANNEL, author, content))
}

fn is_author_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && !name.starts_with('/') && !name.contains(char::is_whitespace)
}

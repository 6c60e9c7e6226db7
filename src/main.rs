use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use postboard::api::ApiClient;
use postboard::config::Config;
use postboard::logging::init_tracing;
use postboard::models::{NewPost, Post, PostId, PostUpdate, ReactionKind, UserId};
use postboard::selectors::{
    select_all_posts, select_all_users, select_post_author, select_post_by_id,
    select_posts_by_user, select_user_by_id,
};
use postboard::store::{RootState, Store, StoreError, UpdateOutcome};

#[derive(Debug, Parser)]
#[command(name = "postboard", version, about = "Browse and edit posts on a REST blog backend")]
struct Cli {
    /// Path to config file (default: platform config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the API base URL from config
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all posts
    List,
    /// Show a single post
    Show { id: PostId },
    /// List users
    Users,
    /// List posts written by a user
    User { id: UserId },
    /// Create a post
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        /// Author id
        #[arg(long = "user")]
        user_id: UserId,
        /// Add to the local collection only, without sending it to the server
        #[arg(long)]
        local: bool,
    },
    /// Edit a post; omitted fields keep their current value
    Edit {
        id: PostId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long = "user")]
        user_id: Option<UserId>,
    },
    /// Delete a post
    Delete { id: PostId },
    /// Add a reaction (thumbsUp, wow, heart, rocket, coffee) to a post
    React { id: PostId, reaction: ReactionKind },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }

    let api = ApiClient::new(&config.api)?;
    let store = Store::spawn(api, &config.store);
    let (posts, _users) = store.init().await;
    if let Err(e) = posts {
        bail!("could not load posts: {}{}", e, retry_hint(&e));
    }

    let state = store.state();

    match cli.command {
        Command::List => {
            for post in select_all_posts(&state) {
                println!("{}\n", render_post(&state, post));
            }
        }
        Command::Show { id } => {
            let post = select_post_by_id(&state, id).context(format!("post {} not found", id))?;
            println!("{}", render_post(&state, post));
        }
        Command::Users => {
            for user in select_all_users(&state) {
                println!("{:>4}  {}", user.id, user.name);
            }
        }
        Command::User { id } => {
            let name = select_user_by_id(&state, id).map_or("Unknown user", |u| u.name.as_str());
            println!("{}", name);
            for post in select_posts_by_user(&state, id) {
                println!("  #{} {}", post.id, post.title);
            }
        }
        Command::Add {
            title,
            body,
            user_id,
            local,
        } => {
            let post = if local {
                store.add_post_local(title, body, user_id).await?
            } else {
                store.create_post(NewPost::new(title, body, user_id)).await?
            };
            println!("{}", render_post(&store.state(), &post));
        }
        Command::Edit {
            id,
            title,
            body,
            user_id,
        } => {
            let current = select_post_by_id(&state, id).context(format!("post {} not found", id))?;
            let mut update = PostUpdate::from_post(current);
            if let Some(title) = title {
                update.title = title;
            }
            if let Some(body) = body {
                update.body = body;
            }
            if let Some(user_id) = user_id {
                update.user_id = user_id;
            }

            match store.update_post(update).await? {
                UpdateOutcome::Applied(post) => println!("{}", render_post(&store.state(), &post)),
                UpdateOutcome::Fallback { post, error } => {
                    eprintln!("Warning: server rejected the update ({}); kept local copy", error);
                    println!("{}", render_post(&store.state(), &post));
                }
                UpdateOutcome::Abandoned => bail!("server returned an unrecognized response; post {} unchanged", id),
            }
        }
        Command::Delete { id } => {
            store.delete_post(id).await?;
            println!("Deleted post {}", id);
        }
        Command::React { id, reaction } => {
            store.add_reaction(id, reaction).await?;
            let state = store.state();
            let post = select_post_by_id(&state, id).context(format!("post {} not found", id))?;
            println!("{}", render_reactions(post));
        }
    }

    Ok(())
}

fn retry_hint(error: &StoreError) -> &'static str {
    match error {
        StoreError::Api(api) if api.is_transient() => " (the server may be temporarily unavailable; try again)",
        _ => "",
    }
}

fn render_post(state: &RootState, post: &Post) -> String {
    format!(
        "#{} {}\n  by {} · {}\n  {}\n  {}",
        post.id,
        post.title,
        select_post_author(state, post),
        post.date.format("%Y-%m-%d %H:%M"),
        post.body.replace('\n', "\n  "),
        render_reactions(post)
    )
}

fn render_reactions(post: &Post) -> String {
    ReactionKind::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.emoji(), post.reactions.get(*kind)))
        .collect::<Vec<_>>()
        .join("  ")
}

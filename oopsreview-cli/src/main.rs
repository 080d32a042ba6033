use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oopsreview_client::{
    ListPostsQuery, NewPost, OopsClient, OopsClientError, Post, PostUpdate,
};

const SESSION_FILE: &str = ".oopsreview_session";
const SERVER_ENV: &str = "OOPSREVIEW_SERVER";
const COOKIE_ENV: &str = "SESSION_COOKIE_NAME";
const DEFAULT_SERVER: &str = "http://127.0.0.1:19090";

#[derive(Debug, Parser)]
#[command(name = "oopsreview-cli", version, about = "CLI клиент для oopsreview-server")]
struct Cli {
    /// Адрес сервера (по умолчанию `OOPSREVIEW_SERVER` или локальный сервер).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Печатать посты как JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Сохраняет пользователя, от имени которого создаются посты.
    Session {
        /// Идентификатор пользователя (24 hex-символа).
        #[arg(long, conflicts_with = "clear")]
        user_id: Option<String>,
        /// Удалить сохранённую сессию.
        #[arg(long)]
        clear: bool,
    },
    /// Список постов.
    List {
        /// Смещение (не номер страницы).
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        username: Option<String>,
        /// Сортировать по просмотрам.
        #[arg(long)]
        featured: bool,
        /// Показать посты, созданные раньше этой отметки (секунды).
        #[arg(long)]
        before: Option<i64>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Получение поста по id (увеличивает счётчик просмотров).
    Get {
        #[arg(long)]
        id: String,
    },
    /// Создание поста (требует сессию).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Теги через запятую.
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Обновление поста. Неуказанные поля не меняются.
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = OopsClient::new(server).map_err(map_client_error)?;
    if let Ok(cookie_name) = std::env::var(COOKIE_ENV) {
        client = client.with_cookie_name(cookie_name);
    }

    if let Some(user_id) = load_session().context("не удалось прочитать .oopsreview_session")? {
        client.set_session(user_id).map_err(map_client_error)?;
    }

    match cli.command {
        Command::Session { user_id, clear } => {
            if clear {
                clear_session().context("не удалось удалить сессию")?;
                println!("Сессия удалена");
            } else if let Some(user_id) = user_id {
                client.set_session(user_id).map_err(map_client_error)?;
                persist_session(&client).context("не удалось сохранить сессию")?;
                println!("Сессия сохранена: {}", client.session().unwrap_or_default());
            } else {
                match client.session() {
                    Some(user_id) => println!("Текущая сессия: {user_id}"),
                    None => println!("Сессия не установлена"),
                }
            }
        }
        Command::List {
            page,
            limit,
            username,
            featured,
            before,
            tag,
            keyword,
        } => {
            let query = ListPostsQuery {
                page,
                limit,
                username,
                featured: featured.then_some(true),
                lastcreatedon: before,
                tag,
                keyword,
            };
            let posts = client.list_posts(&query).await.map_err(map_client_error)?;
            print_list(&posts, cli.json)?;
        }
        Command::Get { id } => {
            let post = client.get_post(&id).await.map_err(map_client_error)?;
            print_post(&post, cli.json)?;
        }
        Command::Create {
            title,
            content,
            tags,
        } => {
            let post = NewPost {
                title,
                content,
                tags,
            };
            client.create_post(&post).await.map_err(map_client_error)?;
            println!("Пост создан: {}", post.title);
        }
        Command::Update {
            id,
            title,
            content,
            tags,
        } => {
            let update = PostUpdate {
                title,
                content,
                tags,
            };
            client
                .update_post(&id, &update)
                .await
                .map_err(map_client_error)?;
            println!("Пост обновлён: id={id}");
        }
    }

    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|server| !server.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw.trim().to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_session_content(raw: &str) -> Option<String> {
    let user_id = raw.trim().to_string();
    if user_id.is_empty() {
        return None;
    }
    Some(user_id)
}

fn load_session() -> io::Result<Option<String>> {
    if !Path::new(SESSION_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(SESSION_FILE)?;
    Ok(parse_session_content(&raw))
}

fn persist_session(client: &OopsClient) -> io::Result<()> {
    if let Some(user_id) = client.session() {
        fs::write(SESSION_FILE, user_id)?;
    }
    Ok(())
}

fn clear_session() -> io::Result<()> {
    if Path::new(SESSION_FILE).exists() {
        fs::remove_file(SESSION_FILE)?;
    }
    Ok(())
}

fn map_client_error(err: OopsClientError) -> anyhow::Error {
    let message = match err {
        OopsClientError::Unauthorized => {
            "требуется сессия: выполните `oopsreview-cli session --user-id ...`".to_string()
        }
        OopsClientError::NotFound => "пост не найден".to_string(),
        OopsClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        OopsClientError::Server(message) => format!("ошибка сервера: {message}"),
        OopsClientError::InvalidResponse(message) => format!("некорректный ответ: {message}"),
        OopsClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_post(post: &Post, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(post)?);
        return Ok(());
    }

    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("content: {}", post.content);
    println!("tags: {}", post.tags.join(", "));
    println!("views: {}", post.views);
    println!("comments: {}", post.comments);
    println!("author: {}", author_name(post));
    if let Some(app) = &post.app {
        println!("app: {}", app.title);
    }
    println!("created_on: {}", post.created_on);
    println!("updated_on: {}", post.updated_on);
    Ok(())
}

fn print_list(posts: &[Post], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("Постов нет");
        return Ok(());
    }

    println!("Постов: {}", posts.len());
    for post in posts {
        println!(
            "- [{}] {} (author={}, views={}, created_on={})",
            post.id,
            post.title,
            author_name(post),
            post.views,
            post.created_on
        );
    }
    Ok(())
}

fn author_name(post: &Post) -> &str {
    post.author
        .as_ref()
        .map(|author| author.username.as_str())
        .unwrap_or("-")
}

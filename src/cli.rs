// src/cli.rs

use crate::config::AppConfig;
use crate::directory_service::{load_snapshot, DirectoryService};
use crate::events::{BuildEvent, CollectingObserver};
use crate::hierarchy::{ContainerNode, HierarchyBuilder, LeafKind, TreeChild, TreeRoot};
use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

// === CLI ===

#[derive(Parser)]
#[command(name = "nextdomen-console")]
#[command(author, version, about = "Просмотр иерархии OU Active Directory", long_about = None)]
pub struct Cli {
    /// Файл конфигурации (YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Снимок каталога; по умолчанию snapshot_path из конфига
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Показать дерево подразделений
    Tree {
        /// Оставить только совпадения и их предков
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        json: bool,
    },
    /// Статистика подразделения
    Stats { dn: String },
    /// Проверить снимок на битые и потерянные записи
    Lint,
    /// Показать действующую конфигурацию
    Config,
    /// Запустить веб-API
    Serve {
        /// Адрес (например, 127.0.0.1:8080); по умолчанию из конфига
        #[arg(long)]
        addr: Option<String>,
    },
}

impl Cli {
    fn snapshot_path(&self, config: &AppConfig) -> PathBuf {
        self.snapshot
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.snapshot_path))
    }
}

/// Выполнить команду с уже загруженной конфигурацией
pub async fn run(cli: Cli, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot_path = cli.snapshot_path(&config);
    let options = config.hierarchy_options();

    match cli.command {
        Command::Tree { search, json } => {
            let service = DirectoryService::open(&snapshot_path, options)?;
            let tree = match search.as_deref() {
                Some(term) => service.search(term).await,
                None => service.view().await.as_ref().clone(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                print!("{}", render_tree(&tree));
            }
        }
        Command::Stats { dn } => {
            let service = DirectoryService::open(&snapshot_path, options)?;
            let stats = service.container_stats(&dn).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Lint => {
            let snapshot = load_snapshot(&snapshot_path)?;
            let observer = Arc::new(CollectingObserver::new());
            HierarchyBuilder::new(options)
                .with_observer(observer.clone())
                .build(&snapshot.ous, &snapshot.users, &snapshot.groups);

            let findings: Vec<String> = observer.events().iter().filter_map(describe_finding).collect();
            if findings.is_empty() {
                println!("✅ Замечаний нет");
            } else {
                for finding in &findings {
                    println!("⚠️  {}", finding);
                }
                println!("❌ Замечаний: {}", findings.len());
            }
        }
        Command::Config => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Command::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.web_server.address.clone());
            let service = if snapshot_path.exists() {
                DirectoryService::open(&snapshot_path, options)?
            } else {
                tracing::warn!(path = %snapshot_path.display(), "snapshot not found, starting empty");
                DirectoryService::new(options)
            };
            println!("🚀 Запуск веб-API на http://{}", addr);
            crate::web::run_web_server(Arc::new(service), &addr).await?;
        }
    }

    Ok(())
}

// === Вывод ===

/// Замечание lint для события; штатные события пропускаются
fn describe_finding(event: &BuildEvent) -> Option<String> {
    match event {
        BuildEvent::MalformedDn { record, dn, reason } => {
            Some(format!("{:?}: битый DN '{}' ({})", record, dn, reason))
        }
        BuildEvent::DuplicateDn { record, dn } => Some(format!("{:?}: повтор DN '{}'", record, dn)),
        BuildEvent::OrphanContainer { dn, missing_parent } => {
            Some(format!("OU '{}' без родителя '{}', поднята в корень", dn, missing_parent))
        }
        BuildEvent::UnattachedLeaf { record, dn } => {
            Some(format!("{:?}: нет контейнера для '{}'", record, dn))
        }
        BuildEvent::DepthFlattened { dn, attached_to } => {
            Some(format!("OU '{}' глубже лимита, прикреплена к '{}'", dn, attached_to))
        }
        BuildEvent::LeavesTruncated { .. } | BuildEvent::Built { .. } => None,
    }
}

/// Дерево в виде текста с отступами
pub fn render_tree(tree: &TreeRoot) -> String {
    let mut out = String::new();
    let root = &tree.root;
    let title = if root.name.is_empty() { "(домен)" } else { root.name.as_str() };
    let _ = writeln!(
        out,
        "🌳 {} 👤 {} 👥 {}",
        title, root.total_user_count, root.total_group_count
    );
    render_children(root, "", &mut out);
    out
}

fn render_children(node: &ContainerNode, prefix: &str, out: &mut String) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count && node.hidden_leaf_count == 0;
        let branch = if last { "└── " } else { "├── " };
        match child {
            TreeChild::Container(container) => {
                let _ = writeln!(
                    out,
                    "{}{}📁 {} 👤 {} 👥 {}",
                    prefix, branch, container.name, container.total_user_count, container.total_group_count
                );
                let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
                render_children(container, &nested, out);
            }
            TreeChild::Leaf(leaf) => {
                let icon = match leaf.kind {
                    LeafKind::User => "👤",
                    LeafKind::Group => "👥",
                };
                let _ = writeln!(out, "{}{}{} {}", prefix, branch, icon, leaf.display_name);
            }
        }
    }
    if node.hidden_leaf_count > 0 {
        let _ = writeln!(out, "{}└── … ещё {}", prefix, node.hidden_leaf_count);
    }
}

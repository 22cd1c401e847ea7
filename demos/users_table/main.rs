//! Users table rendered for a few requests
//!
//! This demo shows:
//! - Declaring a table over an in-memory store
//! - Scoped filter, sort and page parameters
//! - Hidden key columns identified through `__hybridId`
//! - The serialized view sent to a front-end

use chrono::{DateTime, TimeZone, Utc};
use hybrid_tables::prelude::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
    email: String,
    role: String,
    joined_at: DateTime<Utc>,
}

impl Model for User {
    fn key(&self) -> Value {
        json!(self.id)
    }
}

struct UsersTable {
    store: InMemoryStore<User>,
}

impl Table for UsersTable {
    type Model = User;
    type Query = InMemoryQuery<User>;

    fn define_query(&self) -> Result<Self::Query> {
        Ok(self.store.query()?.at_path("/admin/users"))
    }

    fn define_refiners(&self) -> Vec<Arc<dyn Refiner<Self::Query>>> {
        vec![
            Filter::make("role").with_label("Role").shared(),
            Filter::make("name")
                .operator(FilterOperator::Contains)
                .shared(),
            Sort::make("name").shared(),
            Sort::make("joined_at")
                .with_label("Joined")
                .default(SortDirection::Desc)
                .shared(),
        ]
    }

    fn define_columns(&self) -> Vec<Arc<dyn TableColumn<User>>> {
        vec![
            Column::make("name").with_label("Name").shared(),
            Column::make("email").transform(transforms::lowercase()).shared(),
            Column::<User>::make("role")
                .with_extra(|ctx| {
                    let mut extra = Record::new();
                    extra.insert("badge".into(), json!(ctx.model.role == "admin"));
                    Ok(extra)
                })
                .shared(),
            Column::make("joined_at")
                .with_label("Joined")
                .transform(transforms::date_format("%b %-d, %Y"))
                .shared(),
        ]
    }

    fn options(&self) -> TableOptions {
        TableOptions::new().per_page(3).scoped("users")
    }
}

fn seed() -> Result<InMemoryStore<User>> {
    let store = InMemoryStore::new();
    let people = [
        ("Ada Lovelace", "ADA@example.com", "admin"),
        ("Grace Hopper", "grace@example.com", "member"),
        ("Alan Turing", "alan@example.com", "member"),
        ("Edsger Dijkstra", "edsger@example.com", "guest"),
        ("Barbara Liskov", "barbara@example.com", "admin"),
    ];

    for (id, (name, email, role)) in (1u64..).zip(people) {
        store.insert(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            joined_at: Utc
                .with_ymd_and_hms(2023, id as u32, 12, 8, 0, 0)
                .single()
                .unwrap_or_default(),
        })?;
    }

    Ok(store)
}

fn render(store: &InMemoryStore<User>, uri: &str, config: &HybridConfig) -> Result<()> {
    let uri: Uri = uri.parse()?;
    let table = UsersTable {
        store: store.clone(),
    };

    let mut session = TableSession::with_config(table, RequestContext::from_uri(&uri), config);
    match session.to_view() {
        Ok(view) => println!("{}\n", view.to_json_pretty()?),
        Err(e) => println!("❌ {} -> {}\n", e.error_code(), e),
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("📋 Hybrid Tables Demo");
    println!("=====================\n");

    let config = HybridConfig::from_yaml_str("tables:\n  enable_actions: true\n")?;
    let store = seed()?;
    println!("✅ Seeded {} users\n", store.len()?);

    println!("➡️  First page, newest first");
    render(&store, "/admin/users", &config)?;

    println!("➡️  Admins by name");
    render(&store, "/admin/users?users_filters%5Brole%5D=admin&users_sort=name", &config)?;

    println!("➡️  Second page");
    render(&store, "/admin/users?users_page=2", &config)?;

    println!("➡️  Malformed page parameter falls back to page 1");
    render(&store, "/admin/users?users_page=abc", &config)?;

    Ok(())
}

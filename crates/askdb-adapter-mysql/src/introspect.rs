//! Live schema introspection over `information_schema`.
//!
//! Produces the restricted schema description embedded in the model prompt:
//! allowlisted tables and views only, blacklisted columns omitted, with
//! primary-key/index flags, declared types, and stored comments.

use crate::error::SchemaError;
use askdb_core::AccessPolicy;
use sqlx::{MySqlPool, Row};

/// One column retained for display.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub primary_key: bool,
    pub indexed: bool,
    pub comment: String,
}

/// One allowlisted table or view with its permitted columns.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

/// Introspect the current database into a human-readable description.
///
/// Lists base tables and views, filters to the allowlist, and lists each
/// retained entity's non-blacklisted columns. Metadata failures and an
/// empty retained set both return an error so the caller can fall back;
/// an empty-but-valid-looking description is never produced.
pub async fn introspect_schema(
    pool: &MySqlPool,
    policy: &AccessPolicy,
) -> Result<String, SchemaError> {
    let entities = fetch_allowed_entities(pool, policy).await?;
    if entities.is_empty() {
        return Err(SchemaError::NoAllowedEntities);
    }
    Ok(render_description(&entities))
}

async fn fetch_allowed_entities(
    pool: &MySqlPool,
    policy: &AccessPolicy,
) -> Result<Vec<EntityInfo>, SchemaError> {
    // Base tables and views together; the allowlist does not distinguish.
    let entity_rows = sqlx::query(
        r#"
        select table_name as table_name
        from information_schema.tables
        where table_schema = database()
          and table_type in ('BASE TABLE', 'VIEW')
        order by table_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut entities = Vec::new();
    for row in entity_rows {
        let table_name: String = row.get("table_name");
        if !policy.allows_table(&table_name) {
            continue;
        }
        let columns = fetch_columns(pool, &table_name, policy).await?;
        entities.push(EntityInfo {
            name: table_name,
            columns,
        });
    }

    Ok(entities)
}

async fn fetch_columns(
    pool: &MySqlPool,
    table_name: &str,
    policy: &AccessPolicy,
) -> Result<Vec<ColumnInfo>, SchemaError> {
    let column_rows = sqlx::query(
        r#"
        select column_name as column_name,
               column_type as column_type,
               column_key as column_key,
               column_comment as column_comment
        from information_schema.columns
        where table_schema = database()
          and table_name = ?
        order by ordinal_position
        "#,
    )
    .bind(table_name)
    .fetch_all(pool)
    .await?;

    let mut columns = Vec::new();
    for row in column_rows {
        let name: String = row.get("column_name");
        if policy.hides_column(&name) {
            continue;
        }
        let column_key: String = row.get("column_key");
        columns.push(ColumnInfo {
            name,
            data_type: row.get("column_type"),
            primary_key: column_key == "PRI",
            indexed: !column_key.is_empty(),
            comment: row.get("column_comment"),
        });
    }

    Ok(columns)
}

/// Render retained entities into the description text shown to the model.
pub fn render_description(entities: &[EntityInfo]) -> String {
    let mut description =
        String::from("Database schema (allowed tables and views, blacklisted columns excluded):\n");

    for entity in entities {
        description.push_str(&format!("\n- Table '{}':\n", entity.name));

        if entity.columns.is_empty() {
            description.push_str("    (no columns permitted for display)\n");
            continue;
        }

        for (position, column) in entity.columns.iter().enumerate() {
            let primary_key = if column.primary_key { "PRIMARY KEY" } else { "" };
            let indexed = if column.indexed { "INDEXED" } else { "" };
            description.push_str(&format!(
                "    {}\t{}\t{}\t{}\t{}",
                position + 1,
                column.name,
                primary_key,
                indexed,
                column.data_type
            ));
            if !column.comment.is_empty() {
                description.push_str(&format!(": {}", column.comment));
            }
            description.push('\n');
        }
    }

    description
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entities() -> Vec<EntityInfo> {
        vec![
            EntityInfo {
                name: "events_view".to_string(),
                columns: vec![
                    ColumnInfo {
                        name: "event_id".to_string(),
                        data_type: "bigint unsigned".to_string(),
                        primary_key: true,
                        indexed: true,
                        comment: String::new(),
                    },
                    ColumnInfo {
                        name: "name".to_string(),
                        data_type: "varchar(255)".to_string(),
                        primary_key: false,
                        indexed: false,
                        comment: "display name".to_string(),
                    },
                ],
            },
            EntityInfo {
                name: "results_view".to_string(),
                columns: vec![],
            },
        ]
    }

    #[test]
    fn renders_entities_and_annotations() {
        let text = render_description(&sample_entities());
        assert!(text.starts_with("Database schema"));
        assert!(text.contains("- Table 'events_view':"));
        assert!(text.contains("1\tevent_id\tPRIMARY KEY\tINDEXED\tbigint unsigned"));
        assert!(text.contains("2\tname\t\t\tvarchar(255): display name"));
    }

    #[test]
    fn entity_with_no_permitted_columns_is_marked() {
        let text = render_description(&sample_entities());
        assert!(text.contains("- Table 'results_view':"));
        assert!(text.contains("(no columns permitted for display)"));
    }
}

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use crate::models::{Element, Interface};
use crate::utils::{commastr_to_list, qualify_hostname};

const SELECT_ELEMENT: &str = r#"
    SELECT id, hostname, manufacturer, model, comments, tags, parents, role,
           site_name, platform, ipv4_addr, ipv6_addr, active, alarm_timeperiod,
           alarm_destination, connection_method, monitor_icinga, monitor_librenms,
           backup_oxidized
    FROM elements
"#;

/// Element cache database operations
pub struct ElementRepo;

impl ElementRepo {
    /// Replace every element and interface row carrying the given source tag.
    /// Delete and re-insert run inside one transaction, so readers never see
    /// a partial replacement and rows from other sources stay untouched.
    pub async fn replace_source(pool: &Pool<Sqlite>, src: &str, elements: &[Element]) -> Result<()> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM elements WHERE _src = ?")
            .bind(src)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM interfaces WHERE _src = ?")
            .bind(src)
            .execute(&mut *tx)
            .await?;

        for element in elements {
            let result = sqlx::query(
                r#"
                INSERT INTO elements (hostname, manufacturer, model, comments, tags, parents,
                                      role, site_name, platform, ipv4_addr, ipv6_addr, active,
                                      alarm_timeperiod, alarm_destination, connection_method,
                                      monitor_icinga, monitor_librenms, backup_oxidized, _src)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&element.hostname)
            .bind(&element.manufacturer)
            .bind(&element.model)
            .bind(&element.comments)
            .bind(element.tags.join(","))
            .bind(element.parents.join(","))
            .bind(&element.role)
            .bind(&element.site_name)
            .bind(&element.platform)
            .bind(&element.ipv4_addr)
            .bind(&element.ipv6_addr)
            .bind(element.active as i32)
            .bind(&element.alarm_timeperiod)
            .bind(element.alarm_destination.join(","))
            .bind(&element.connection_method)
            .bind(element.monitor_icinga as i32)
            .bind(element.monitor_librenms as i32)
            .bind(element.backup_oxidized as i32)
            .bind(src)
            .execute(&mut *tx)
            .await?;

            let element_id = result.last_insert_rowid();
            for interface in &element.interfaces {
                sqlx::query(
                    r#"
                    INSERT INTO interfaces (elementid, name, role, ipv4_prefix, ipv6_prefix, active, _src)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(element_id)
                .bind(&interface.name)
                .bind(&interface.role)
                .bind(&interface.ipv4_prefix)
                .bind(&interface.ipv6_prefix)
                .bind(interface.active as i32)
                .bind(src)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn get(
        pool: &Pool<Sqlite>,
        hostname: &str,
        default_domain: &str,
    ) -> Result<Option<Element>> {
        let hostname = qualify_hostname(hostname, default_domain);
        let row = sqlx::query(&format!("{} WHERE hostname = ?", SELECT_ELEMENT))
            .bind(&hostname)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::load_element(pool, &row, default_domain).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(pool: &Pool<Sqlite>, default_domain: &str) -> Result<Vec<Element>> {
        let rows = sqlx::query(&format!("{} ORDER BY id", SELECT_ELEMENT))
            .fetch_all(pool)
            .await?;

        let mut elements = Vec::with_capacity(rows.len());
        for row in &rows {
            elements.push(Self::load_element(pool, row, default_domain).await?);
        }
        Ok(elements)
    }

    /// Rebuild a full element from its row plus its interface rows,
    /// in insertion order.
    async fn load_element(
        pool: &Pool<Sqlite>,
        row: &SqliteRow,
        default_domain: &str,
    ) -> Result<Element> {
        let element_id: i64 = row.get("id");
        let mut element = map_element_row(row, default_domain);

        let interface_rows = sqlx::query(
            "SELECT name, role, ipv4_prefix, ipv6_prefix, active FROM interfaces WHERE elementid = ? ORDER BY id",
        )
        .bind(element_id)
        .fetch_all(pool)
        .await?;

        element.interfaces = interface_rows.iter().map(map_interface_row).collect();
        Ok(element)
    }
}

fn map_element_row(row: &SqliteRow, default_domain: &str) -> Element {
    Element {
        hostname: row.get("hostname"),
        manufacturer: row.get("manufacturer"),
        model: row.get("model"),
        comments: row.get("comments"),
        tags: commastr_to_list(row.get::<String, _>("tags").as_str(), None),
        parents: commastr_to_list(row.get::<String, _>("parents").as_str(), Some(default_domain)),
        role: row.get("role"),
        site_name: row.get("site_name"),
        platform: row.get("platform"),
        ipv4_addr: row.get("ipv4_addr"),
        ipv6_addr: row.get("ipv6_addr"),
        active: row.get::<i64, _>("active") == 1,
        alarm_timeperiod: row.get("alarm_timeperiod"),
        alarm_destination: commastr_to_list(row.get::<String, _>("alarm_destination").as_str(), None),
        connection_method: row.get("connection_method"),
        monitor_icinga: row.get::<i64, _>("monitor_icinga") == 1,
        monitor_librenms: row.get::<i64, _>("monitor_librenms") == 1,
        backup_oxidized: row.get::<i64, _>("backup_oxidized") == 1,
        interfaces: Vec::new(),
    }
}

fn map_interface_row(row: &SqliteRow) -> Interface {
    Interface {
        name: row.get("name"),
        role: row.get("role"),
        ipv4_prefix: row.get("ipv4_prefix"),
        ipv6_prefix: row.get("ipv6_prefix"),
        active: row.get::<i64, _>("active") == 1,
    }
}

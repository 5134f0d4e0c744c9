//! List page scenarios over the built-in catalogs.

use insta::assert_snapshot;
use serde_json::{json, Value as Json};
use sift_rules::{Combinator, Rule, RuleGroup, RuleKey};
use sift_views::{catalogs, FeatureConfig, Pipeline, ResultPage, ViewDescription};

fn customer_records() -> Vec<Json> {
    let types = ["Retail", "Wholesale", "Distributor"];
    (1..=30)
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Customer {id:02}"),
                "email": format!("c{id}@example.com"),
                "type": types[(id as usize) % 3],
                "status": if id % 5 == 0 { "inactive" } else { "active" },
                "total_spent": id * 1000,
                "last_order_date": format!("2024-{:02}-15", (id % 12) + 1),
                "tags": if id % 4 == 0 { json!(["vip"]) } else { json!([]) },
            })
        })
        .collect()
}

fn ids(page: &ResultPage<&Json>) -> Vec<i64> {
    page.items.iter().filter_map(|r| r["id"].as_i64()).collect()
}

fn customers() -> (FeatureConfig, Pipeline) {
    let config = catalogs::customers().unwrap();
    let pipeline = Pipeline::new(&config);
    (config, pipeline)
}

#[test]
fn page_beyond_the_last_is_empty_but_keeps_the_total() {
    let (_, pipeline) = customers();
    let records: Vec<Json> = customer_records().into_iter().take(25).collect();

    let third = pipeline.run(&records, &ViewDescription::new().page(3).page_size(10));
    assert_eq!(third.total_matched, 25);
    assert_eq!(third.total_pages, 3);
    assert_eq!(ids(&third), [21, 22, 23, 24, 25]);

    let fourth = pipeline.run(&records, &ViewDescription::new().page(4).page_size(10));
    assert!(fourth.items.is_empty());
    assert_eq!(fourth.total_matched, 25);
    assert_eq!(fourth.total_pages, 3);
}

#[test]
fn price_token_sorts_descending_and_empty_token_keeps_order() {
    let pipeline = Pipeline::new(&catalogs::bundles().unwrap());
    let records = vec![
        json!({"product_sku": "A", "cart_total": 100}),
        json!({"product_sku": "B", "cart_total": 300}),
        json!({"product_sku": "C", "cart_total": 200}),
    ];
    let totals = |view: &ViewDescription| -> Vec<i64> {
        pipeline
            .run(&records, view)
            .items
            .iter()
            .filter_map(|r| r["cart_total"].as_i64())
            .collect()
    };

    assert_eq!(totals(&ViewDescription::new().sort("cart_total_desc")), [300, 200, 100]);
    assert_eq!(totals(&ViewDescription::new().sort("")), [100, 300, 200]);
    assert_eq!(totals(&ViewDescription::new().sort("nonsense_desc")), [100, 300, 200]);
}

#[test]
fn segment_then_equality_then_sort() {
    let (_, pipeline) = customers();
    let records = customer_records();

    let mut group = RuleGroup::new(Combinator::All);
    group.update("rule-1", RuleKey::Field, "total_spent");
    group.update("rule-1", RuleKey::Operator, "greater_equal");
    group.update("rule-1", RuleKey::Value, "20000");

    let view = pipeline
        .default_view()
        .rules(group)
        .filter_in("type", ["retail", "wholesale"])
        .filter_eq("status", "active")
        .sort("total_spent_desc")
        .page_size(5);

    let page = pipeline.run(&records, &view);
    // 20..=30, minus Distributor (id % 3 == 2), minus inactive (id % 5 == 0).
    assert_eq!(page.total_matched, 5);
    assert_eq!(ids(&page), [28, 27, 24, 22, 21]);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.range(), Some((1, 5)));

    let next = pipeline.run(&records, &view.clone().page(2));
    assert!(next.items.is_empty());
    assert_eq!(next.total_matched, 5);
}

#[test]
fn search_reaches_tags_and_email() {
    let (_, pipeline) = customers();
    let records = customer_records();

    let vip = pipeline.run(&records, &ViewDescription::new().search("VIP").page_size(50));
    assert_eq!(vip.total_matched, 7);

    let email = pipeline.run(&records, &ViewDescription::new().search("c13@"));
    assert_eq!(ids(&email), [13]);
}

#[test]
fn view_without_rule_builder_skips_the_rule_stage() {
    let (_, pipeline) = customers();
    let records = customer_records();

    let plain = pipeline.run(&records, &ViewDescription::new());
    assert_eq!(plain.total_matched, 30);

    let vacuous = pipeline.run(&records, &ViewDescription::new().rules(RuleGroup::default()));
    assert_eq!(vacuous.total_matched, 0);
}

#[test]
fn view_state_survives_json() {
    let (_, pipeline) = customers();
    let records = customer_records();

    let view = pipeline
        .default_view()
        .rules(RuleGroup::with_rules(
            Combinator::Any,
            [Rule::new("rule-1", "last_order_date", "before", "2024-03-01")],
        ))
        .sort("name_desc");
    let restored: ViewDescription =
        serde_json::from_str(&serde_json::to_string(&view).unwrap()).unwrap();

    assert_eq!(
        pipeline.run(&records, &restored),
        pipeline.run(&records, &view)
    );
}

#[test]
fn customer_page_snapshot() {
    let (config, pipeline) = customers();
    let records = customer_records();

    let view = pipeline
        .default_view()
        .toggle_column("email")
        .toggle_column("tags")
        .filter_eq("type", "Distributor")
        .sort("total_spent_desc")
        .page_size(4);
    let page = pipeline.run(&records, &view);
    let columns = pipeline.project_columns(&view);

    let mut lines = vec![columns
        .iter()
        .map(|c| c.label.as_str())
        .collect::<Vec<_>>()
        .join(" | ")];
    for record in &page.items {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| match &record[c.key.as_str()] {
                Json::String(s) => s.clone(),
                Json::Array(items) if !items.is_empty() => items
                    .iter()
                    .filter_map(Json::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
                Json::Null | Json::Array(_) => "-".to_string(),
                other => other.to_string(),
            })
            .collect();
        lines.push(cells.join(" | "));
    }
    if let Some((first, last)) = page.range() {
        lines.push(format!(
            "{} {}-{} of {}",
            config.name, first, last, page.total_matched
        ));
    }

    assert_snapshot!(lines.join("\n"), @r"
    Name | Type | Status | Total spent | Orders | Last order | Tags
    Customer 29 | Distributor | active | 29000 | - | 2024-06-15 | -
    Customer 26 | Distributor | active | 26000 | - | 2024-03-15 | -
    Customer 23 | Distributor | active | 23000 | - | 2024-12-15 | -
    Customer 20 | Distributor | inactive | 20000 | - | 2024-09-15 | vip
    customers 1-4 of 10
    ");
}

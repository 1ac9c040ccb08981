use chrono::NaiveDate;
use pos_sales_ledger::*;
use serde_json::json;

fn entry(name: &str, cost_price: f64, margin_percent: f64, category: &str) -> InventoryEntry {
    InventoryEntry {
        name: name.to_string(),
        cost_price,
        selling_price: 0.0,
        margin_percent,
        category: category.to_string(),
    }
}

fn grid(value: serde_json::Value) -> Grid {
    match value {
        serde_json::Value::Array(rows) => grid_from_values(&rows),
        other => panic!("expected an array grid, got {}", other),
    }
}

fn restaurant_report() -> Grid {
    grid(json!([
        ["Harbour Grill"],
        ["Group Report : 01-11-2025 to 02-11-2025"],
        [],
        ["Item Sales", "Item", "Qty", "Gross", "Discount", "Net", "Tax", "Total"],
        ["Dine In Food Menu", null],
        [null, "Chilli Chicken", 3, 1047, 0, 1047, 52.35, 1099.35],
        [null, "Veg Fried Rice", 2, 498, 20, 478, 23.9, 501.9],
        [null, "Konaseema Boneless Biriyani", 1, 449, 0, 449, 22.45, 471.45],
        ["Sub Total", null, null, null, null, 1974, null, null],
        ["Bar Menu", null],
        [null, "Coke", 5, 495, 0, 495, 24.75, 519.75],
        [null, "Kf Ultra Pint", 2, 698, 0, 698, 34.9, 732.9],
        [null, "Mystery Dish", 1, 250, 0, 250, 12.5, 262.5],
        ["Sub Total", null, null, null, null, 1443, null, null],
        ["Total", "", 14, 3437, 20, 3417, 170.85, 3587.85],
        ["Max", "", 5, 1047, 20, 1047, 52.35, 1099.35],
        ["Min", "", 1, 250, 0, 250, 12.5, 262.5],
        ["Avg", "", 2.33, 572.83, 3.33, 569.5, 28.48, 597.98],
        ["Round off", null, null, null, null, null, null, 0.15]
    ]))
}

#[test]
fn test_single_item_report_with_date_range() {
    let rows = grid(json!([
        ["Acme Bar", null, null],
        ["17-10-2025 to 18-10-2025", null, null],
        [],
        ["Food", null],
        [null, "Chicken", 3, 1100, 53, 1047, 52.38, 1099.38]
    ]));
    let inventory = InventorySnapshot::new(vec![entry("Chicken", 175.0, 50.0, "Food")]);

    let result = parse_sales_report(&rows, &inventory, &ParserConfig::default()).unwrap();

    assert_eq!(result.restaurant_name, "Acme Bar");
    assert_eq!(result.date_range, "17-10-2025 to 18-10-2025");
    assert_eq!(result.date, NaiveDate::from_ymd_opt(2025, 10, 18).unwrap());
    assert_eq!(result.items.len(), 1);

    let item = &result.items[0];
    assert_eq!(item.item_name, "Chicken");
    assert_eq!(item.category, "Food");
    assert_eq!(item.quantity, 3.0);
    assert_eq!(item.net_amount, 1047.0);
    assert_eq!(item.total_cost, 525.0);
    assert_eq!(item.profit, 522.0);
    assert_eq!(item.margin_percent, 49.9);
    assert_eq!(item.cost_match, CostMatch::Exact);

    assert_eq!(result.categories.len(), 1);
    assert_eq!(result.categories[0].name, "Food");
    assert!(result.warnings.is_empty());

    let serialized = serde_json::to_value(&result).unwrap();
    assert_eq!(serialized["date"], "2025-10-18");
    assert_eq!(serialized["items"][0]["marginPercent"], 49.9);
}

#[test]
fn test_summary_rows_never_become_items() {
    let config = ParserConfig::default();
    let classifier = RowClassifier::new(&config);

    let total = grid(json!([["Total", "", 9, 2980, 139, 2841, 142.14, 2983.14]]));
    let sub_total = grid(json!([["Sub Total", null, null, null, null, 2841, null, null]]));

    assert_eq!(classifier.classify(&total[0]), RowKind::Skip);
    assert_eq!(classifier.classify(&sub_total[0]), RowKind::Skip);

    let inventory = InMemoryInventory::with_default_catalog().unwrap();
    let result =
        parse_sales_report(&restaurant_report(), &inventory.snapshot(), &config).unwrap();

    let names: Vec<&str> = result.items.iter().map(|i| i.item_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Chilli Chicken",
            "Veg Fried Rice",
            "Konaseema Boneless Biriyani",
            "Coke",
            "Kf Ultra Pint",
            "Mystery Dish"
        ]
    );
    assert_eq!(result.summary.total_quantity, 14.0);
}

#[test]
fn test_unknown_item_is_priced_at_zero_cost_and_flagged() {
    let inventory = InMemoryInventory::with_default_catalog().unwrap();
    let result = parse_sales_report(
        &restaurant_report(),
        &inventory.snapshot(),
        &ParserConfig::default(),
    )
    .unwrap();

    let mystery = result
        .items
        .iter()
        .find(|i| i.item_name == "Mystery Dish")
        .unwrap();
    assert_eq!(mystery.cost_price, 0.0);
    assert_eq!(mystery.profit, mystery.net_amount);
    assert_eq!(mystery.margin_percent, 100.0);
    assert_eq!(mystery.expected_margin, 45.0);
    assert_eq!(mystery.cost_match, CostMatch::Unresolved);

    assert!(result.warnings.contains(&ParseWarning::UnresolvedCost {
        item_name: "Mystery Dish".to_string(),
        category: "Bar Menu".to_string(),
        row: 12,
    }));
    assert_eq!(result.unresolved_items().count(), 1);
}

#[test]
fn test_fuzzy_match_is_flagged_and_can_be_disabled() {
    let inventory = InMemoryInventory::with_default_catalog().unwrap();
    let rows = restaurant_report();

    let result =
        parse_sales_report(&rows, &inventory.snapshot(), &ParserConfig::default()).unwrap();
    let pint = result
        .items
        .iter()
        .find(|i| i.item_name == "Kf Ultra Pint")
        .unwrap();
    assert_eq!(pint.cost_match, CostMatch::Fuzzy);
    assert_eq!(pint.cost_price, 181.0);
    assert!(result.warnings.contains(&ParseWarning::FuzzyCostMatch {
        item_name: "Kf Ultra Pint".to_string(),
        matched_name: "Kf Ultra".to_string(),
        row: 11,
    }));

    let strict = InventorySnapshot::new(inventory.snapshot().entries().to_vec()).with_policy(
        CostMatchPolicy {
            allow_fuzzy: false,
            ..Default::default()
        },
    );
    let result = parse_sales_report(&rows, &strict, &ParserConfig::default()).unwrap();
    assert_eq!(result.unresolved_items().count(), 2);
}

#[test]
fn test_item_and_category_invariants() {
    let inventory = InMemoryInventory::with_default_catalog().unwrap();
    let result = process_with_verification(
        &restaurant_report(),
        &inventory.snapshot(),
        &ParserConfig::default(),
        1e-6,
    )
    .unwrap();

    for item in &result.items {
        assert!((item.total_cost - item.cost_price * item.quantity).abs() < 1e-9);
        assert!((item.profit - (item.net_amount - item.total_cost)).abs() < 1e-9);
        assert_eq!(item.margin_percent, margin_percent(item.profit, item.net_amount));
    }

    assert_eq!(result.categories.len(), 2);
    for category in &result.categories {
        let members: Vec<&SaleItem> = result
            .items
            .iter()
            .filter(|i| i.category == category.name)
            .collect();
        assert_eq!(category.item_count, members.len());
        let revenue: f64 = members.iter().map(|i| i.net_amount).sum();
        let cost: f64 = members.iter().map(|i| i.total_cost).sum();
        assert!((category.total_revenue - revenue).abs() < 1e-9);
        assert!((category.total_profit - (revenue - cost)).abs() < 1e-9);
        assert_eq!(category.avg_margin, margin_percent(revenue - cost, revenue));
    }

    let summary = &result.summary;
    assert_eq!(summary.item_count, 6);
    assert!((summary.total_revenue - 3417.0).abs() < 1e-9);
    assert!((summary.net_profit_after_tax - (summary.total_profit - summary.total_tax)).abs() < 1e-9);
}

#[test]
fn test_too_few_rows_is_malformed_input() {
    let rows = grid(json!([["Acme Bar"], ["17-10-2025 to 18-10-2025"], [], ["Food"]]));

    let err = parse_sales_report(&rows, &InventorySnapshot::default(), &ParserConfig::default())
        .unwrap_err();

    assert!(matches!(err, LedgerError::MalformedInput { row_count: 4, .. }));
}

#[test]
fn test_no_items_reports_diagnostics() {
    let rows = grid(json!([
        ["Acme Bar"],
        ["17-10-2025 to 18-10-2025"],
        [],
        ["Food", null],
        ["Total", "", 0, 0, 0, 0, 0, 0],
        [null, "Chicken", 0, 0, 0, 0, 0, 0]
    ]));

    let err = parse_sales_report(&rows, &InventorySnapshot::default(), &ParserConfig::default())
        .unwrap_err();

    match &err {
        LedgerError::NoItemsFound(diagnostics) => {
            assert_eq!(diagnostics.total_rows, 6);
            assert_eq!(diagnostics.inspected_rows, 5);
            assert_eq!(diagnostics.skipped_rows, 1);
            assert_eq!(diagnostics.unclassified_rows, 1);
            assert_eq!(diagnostics.sample_rows.len(), 6);
        }
        other => panic!("expected NoItemsFound, got {:?}", other),
    }

    let report = err.report();
    assert_eq!(report.kind, "no_items_found");
    assert!(report.diagnostics.is_some());
}

#[test]
fn test_parsing_is_idempotent() {
    let inventory = InMemoryInventory::with_default_catalog().unwrap();
    let snapshot = inventory.snapshot();
    let rows = restaurant_report();
    let config = ParserConfig::default();

    let first = parse_sales_report(&rows, &snapshot, &config).unwrap();
    let second = parse_sales_report(&rows, &snapshot, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_inventory_edits_do_not_leak_into_a_snapshot() {
    let inventory = InMemoryInventory::with_default_catalog().unwrap();
    let snapshot = inventory.snapshot();

    let coke = inventory.find_by_name("coke").unwrap();
    inventory
        .update(
            coke.id,
            InventoryUpdate {
                cost_price: Some(45.0),
                ..Default::default()
            },
        )
        .unwrap();

    let rows = restaurant_report();
    let before = parse_sales_report(&rows, &snapshot, &ParserConfig::default()).unwrap();
    let after =
        parse_sales_report(&rows, &inventory.snapshot(), &ParserConfig::default()).unwrap();

    let coke_cost = |r: &ParseResult| {
        r.items
            .iter()
            .find(|i| i.item_name == "Coke")
            .map(|i| i.cost_price)
    };
    assert_eq!(coke_cost(&before), Some(30.0));
    assert_eq!(coke_cost(&after), Some(45.0));
}

#[test]
fn test_import_and_analytics() {
    let inventory = InMemoryInventory::with_default_catalog().unwrap();
    let store = InMemorySalesStore::new();
    let config = ParserConfig::default();

    let (first, _) = SalesReportProcessor::import(
        "harbour-1.xlsx",
        &restaurant_report(),
        &inventory,
        &store,
        &config,
    )
    .unwrap();
    let (second, _) = SalesReportProcessor::import(
        "harbour-2.xlsx",
        &restaurant_report(),
        &inventory,
        &store,
        &config,
    )
    .unwrap();

    let records = store.list(&SalesFilter::default());
    assert_eq!(
        records.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![second, first]
    );

    let stats = dashboard_stats(&records);
    assert_eq!(stats.record_count, 2);
    assert!((stats.total_revenue - 6834.0).abs() < 1e-9);
    assert_eq!(stats.total_orders, 28.0);

    let trends = daily_trends(&records);
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].date, NaiveDate::from_ymd_opt(2025, 11, 2).unwrap());

    let top = top_items(&records, 3);
    assert_eq!(top[0].name, "Chilli Chicken");
    assert!((top[0].revenue - 2094.0).abs() < 1e-9);

    let categories = category_analytics(&records);
    assert_eq!(
        categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["Dine In Food Menu", "Bar Menu"]
    );

    let insights = margin_insights(&store.fetch(first).unwrap().items);
    assert!(insights
        .low_margin_items
        .iter()
        .all(|m| m.actual_margin < 40.0));
    assert_eq!(insights.top_profit_items.len(), 5);

    assert!(store.delete(first));
    assert_eq!(store.list(&SalesFilter::default()).len(), 1);
}

#[test]
fn test_schema_generation() {
    let result_schema = ParseResult::schema_as_json().unwrap();
    assert!(result_schema.contains("restaurantName"));
    assert!(result_schema.contains("warnings"));

    let config_schema = ParserConfig::schema_as_json().unwrap();
    assert!(config_schema.contains("skipLabels"));
}

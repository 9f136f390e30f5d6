// Resolution of types declared in other files and packages
use api_doc_from_source::config::ExtractionConfig;
use api_doc_from_source::extractor::{
    spring::SpringExtractor, EndpointEntry, RouteExtractor, RESPONSE_PLACEHOLDER,
};
use api_doc_from_source::field_expander::FieldNode;
use api_doc_from_source::parser::{AstParser, ParsedFile};
use api_doc_from_source::symbol_table::SymbolTable;
use pretty_assertions::assert_eq;
use std::path::Path;

const CATALOG_ITEM: &str = r#"
    package com.acme.catalog;

    public class Item {
        private String sku;
        private BigDecimal price;
    }
"#;

const WAREHOUSE_ITEM: &str = r#"
    package com.acme.warehouse;

    public class Item {
        private String bin;
        private int quantity;
    }
"#;

const ORDER: &str = r#"
    package com.acme.order;

    import com.acme.catalog.Item;
    import java.util.List;

    public class Order {
        private Long id;
        private List<Item> items;
        private Line primary;

        public static class Line {
            private int position;
            private Item item;
        }
    }
"#;

fn extract(files: &[(&str, &str)]) -> Vec<EndpointEntry> {
    let parsed_files: Vec<ParsedFile> = files
        .iter()
        .map(|(path, code)| {
            AstParser::parse_source(Path::new(path), code.to_string())
                .expect("Failed to parse test code")
        })
        .collect();

    let config = ExtractionConfig::default();
    let table = SymbolTable::build(&parsed_files, &config.exclude_dirs);
    SpringExtractor::new(config.max_depth).extract_endpoints(&table)
}

fn response_fields(endpoint: &EndpointEntry) -> &[FieldNode] {
    &endpoint.responses[RESPONSE_PLACEHOLDER].fields
}

fn names(fields: &[FieldNode]) -> Vec<&str> {
    fields.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_import_selects_between_same_named_types() {
    let controller = r#"
        package com.acme.web;

        import com.acme.warehouse.Item;

        @RestController
        public class StockController {
            @GetMapping("/stock")
            public Item stock() { return null; }
        }
    "#;

    let endpoints = extract(&[
        ("src/com/acme/catalog/Item.java", CATALOG_ITEM),
        ("src/com/acme/warehouse/Item.java", WAREHOUSE_ITEM),
        ("src/com/acme/web/StockController.java", controller),
    ]);

    assert_eq!(names(response_fields(&endpoints[0])), vec!["bin", "quantity"]);
}

#[test]
fn test_same_package_wins_without_import() {
    let controller = r#"
        package com.acme.catalog;

        @RestController
        public class ItemController {
            @GetMapping("/items/{sku}")
            public Item get(@PathVariable String sku) { return null; }
        }
    "#;

    let endpoints = extract(&[
        ("src/com/acme/catalog/Item.java", CATALOG_ITEM),
        ("src/com/acme/warehouse/Item.java", WAREHOUSE_ITEM),
        ("src/com/acme/catalog/ItemController.java", controller),
    ]);

    assert_eq!(names(response_fields(&endpoints[0])), vec!["sku", "price"]);
}

#[test]
fn test_ambiguous_name_is_left_unexpanded() {
    let controller = r#"
        package com.acme.web;

        @RestController
        public class SearchController {
            @PostMapping("/search")
            public Item search(@RequestBody Item probe) { return null; }
        }
    "#;

    let endpoints = extract(&[
        ("src/com/acme/catalog/Item.java", CATALOG_ITEM),
        ("src/com/acme/warehouse/Item.java", WAREHOUSE_ITEM),
        ("src/com/acme/web/SearchController.java", controller),
    ]);

    let endpoint = &endpoints[0];
    let body = endpoint.request.body.as_ref().unwrap();
    assert_eq!(body.type_name, "Item");
    assert!(body.fields.is_empty());
    assert!(response_fields(endpoint).is_empty());
}

#[test]
fn test_qualified_reference_needs_no_import() {
    let controller = r#"
        package com.acme.web;

        @RestController
        public class BinController {
            @GetMapping("/bins")
            public com.acme.warehouse.Item bins() { return null; }
        }
    "#;

    let endpoints = extract(&[
        ("src/com/acme/catalog/Item.java", CATALOG_ITEM),
        ("src/com/acme/warehouse/Item.java", WAREHOUSE_ITEM),
        ("src/com/acme/web/BinController.java", controller),
    ]);

    assert_eq!(names(response_fields(&endpoints[0])), vec!["bin", "quantity"]);
}

#[test]
fn test_nested_fields_resolve_from_their_declaring_file() {
    // the controller never imports Item; Order's own import decides which one is used
    let controller = r#"
        package com.acme.web;

        import com.acme.order.Order;

        @RestController
        @RequestMapping("/orders")
        public class OrderController {
            @GetMapping("/{id}")
            public Order get(@PathVariable Long id) { return null; }

            @GetMapping("/{id}/lines/{position}")
            public Order.Line line(@PathVariable Long id, @PathVariable int position) { return null; }
        }
    "#;

    let endpoints = extract(&[
        ("src/com/acme/catalog/Item.java", CATALOG_ITEM),
        ("src/com/acme/warehouse/Item.java", WAREHOUSE_ITEM),
        ("src/com/acme/order/Order.java", ORDER),
        ("src/com/acme/web/OrderController.java", controller),
    ]);

    let order = response_fields(&endpoints[0]);
    assert_eq!(names(order), vec!["id", "items", "primary"]);
    assert_eq!(names(&order[1].children), vec!["sku", "price"]);
    assert_eq!(names(&order[2].children), vec!["position", "item"]);
    assert_eq!(names(&order[2].children[1].children), vec!["sku", "price"]);

    let line = &endpoints[1];
    assert_eq!(line.path, "/orders/{id}/lines/{position}");
    assert_eq!(line.responses[RESPONSE_PLACEHOLDER].type_name, "Order.Line");
    assert_eq!(names(response_fields(line)), vec!["position", "item"]);
}

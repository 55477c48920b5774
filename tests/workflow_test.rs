//! End-to-end workflow tests: graph declaration through final merge.

use gather::{
    ArrayStrategy, Contract, ContractFilter, DeepMerge, ExecutionError, ExecutionMode,
    ShallowMerge, TaskRegistry, Validation, ValidationError, Workflow,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Opt into log output with RUST_LOG=gather=debug
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn enrichment_registry() -> TaskRegistry {
    let registry = TaskRegistry::new();
    registry.register("fetch_from_xml_catalog", |_| async {
        Ok(json!({"xml_catalog_ran": true}))
    });
    registry.register("fetch_from_pim", |_| async { Ok(json!({"pim_ran": true})) });
    registry.register("tag_from_images", |input| async move {
        Ok(json!({"tags_ran": true, "tag_input": input}))
    });
    registry
}

#[tokio::test]
async fn test_merges_every_task_output_with_the_input() {
    init_tracing();

    let workflow = Workflow::builder()
        .root_task("fetch_from_xml_catalog")
        .root_task("fetch_from_pim")
        .task("tag_from_images", ["fetch_from_xml_catalog", "fetch_from_pim"])
        .resolver(enrichment_registry())
        .build()
        .unwrap();

    let result = workflow.run(json!({"foo": "bar"})).await.unwrap();

    assert_eq!(result["foo"], "bar");
    assert_eq!(result["xml_catalog_ran"], true);
    assert_eq!(result["pim_ran"], true);
    assert_eq!(result["tags_ran"], true);
}

#[tokio::test]
async fn test_later_batches_see_enriched_input() {
    let workflow = Workflow::builder()
        .root_task("fetch_from_xml_catalog")
        .root_task("fetch_from_pim")
        .task("tag_from_images", ["fetch_from_xml_catalog", "fetch_from_pim"])
        .resolver(enrichment_registry())
        .build()
        .unwrap();

    let result = workflow.run(json!({"foo": "bar"})).await.unwrap();

    // The dependent task ran against the first batch's merged output
    assert_eq!(
        result["tag_input"],
        json!({"foo": "bar", "xml_catalog_ran": true, "pim_ran": true})
    );
}

#[tokio::test]
async fn test_batches_respect_declaration_order() {
    let order = Arc::new(Mutex::new(Vec::<String>::new()));
    let registry = TaskRegistry::new();
    for name in ["one", "two", "three", "four"] {
        let order = Arc::clone(&order);
        registry.register(name, move |_| {
            let order = Arc::clone(&order);
            async move {
                order.lock().unwrap().push(name.to_string());
                Ok(json!({name: true}))
            }
        });
    }

    let workflow = Workflow::builder()
        .root_task("one")
        .task("two", ["one"])
        .task("three", ["one"])
        .task("four", ["two", "three"])
        .resolver(registry)
        .execution_mode(ExecutionMode::Inline)
        .build()
        .unwrap();

    workflow.run(json!({})).await.unwrap();

    // Inline mode drives tasks in extraction order, so the run order is
    // exactly the topological order
    assert_eq!(
        *order.lock().unwrap(),
        vec!["one", "two", "three", "four"]
    );
}

#[tokio::test]
async fn test_failing_task_fails_the_run() {
    let registry = TaskRegistry::new();
    registry.register("good", |_| async { Ok(json!({"good": true})) });
    registry.register("bad", |_| async { Err(ExecutionError::failed("upstream 500")) });

    let workflow = Workflow::builder()
        .root_task("good")
        .root_task("bad")
        .resolver(registry)
        .build()
        .unwrap();

    let result = workflow.run(json!({})).await;
    assert_eq!(result, Err(ExecutionError::failed("upstream 500")));
}

#[tokio::test]
async fn test_shallow_merge_aggregator_replaces_whole_keys() {
    let registry = TaskRegistry::new();
    registry.register("first", |_| async {
        Ok(json!({"user": {"name": "ian"}}))
    });
    registry.register("second", |_| async { Ok(json!({"user": {"id": 1}})) });

    let workflow = Workflow::builder()
        .root_task("first")
        .task("second", ["first"])
        .resolver(registry)
        .aggregator(ShallowMerge::new())
        .build()
        .unwrap();

    let result = workflow.run(json!({})).await.unwrap();
    assert_eq!(result, json!({"user": {"id": 1}}));
}

#[tokio::test]
async fn test_reverse_option_gives_earlier_results_priority() {
    let registry = TaskRegistry::new();
    registry.register("first", |_| async { Ok(json!({"id": 1})) });
    registry.register("second", |_| async { Ok(json!({"id": 2})) });

    let workflow = Workflow::builder()
        .root_task("first")
        .task("second", ["first"])
        .resolver(registry)
        .aggregator(ShallowMerge::new().reverse(true))
        .build()
        .unwrap();

    let result = workflow.run(json!({})).await.unwrap();
    assert_eq!(result["id"], 1);
}

#[tokio::test]
async fn test_array_outputs_concatenate_by_default() {
    let registry = TaskRegistry::new();
    registry.register("catalog_tags", |_| async {
        Ok(json!({"tags": ["catalog"]}))
    });
    registry.register("image_tags", |_| async { Ok(json!({"tags": ["image"]})) });

    let workflow = Workflow::builder()
        .root_task("catalog_tags")
        .task("image_tags", ["catalog_tags"])
        .resolver(registry)
        .build()
        .unwrap();

    let result = workflow.run(json!({})).await.unwrap();
    assert_eq!(result["tags"], json!(["catalog", "image"]));
}

#[tokio::test]
async fn test_array_overwrite_strategy_keeps_latest() {
    let registry = TaskRegistry::new();
    registry.register("catalog_tags", |_| async {
        Ok(json!({"tags": ["catalog"]}))
    });
    registry.register("image_tags", |_| async { Ok(json!({"tags": ["image"]})) });

    let workflow = Workflow::builder()
        .root_task("catalog_tags")
        .task("image_tags", ["catalog_tags"])
        .resolver(registry)
        .aggregator(DeepMerge::new().array_strategy(ArrayStrategy::Overwrite))
        .build()
        .unwrap();

    let result = workflow.run(json!({})).await.unwrap();
    assert_eq!(result["tags"], json!(["image"]));
}

/// Requires `email` to contain `@`; everything else passes.
struct EmailContract;

impl Contract for EmailContract {
    fn validate(&self, input: &Value) -> Validation {
        let output = input.clone();
        let mut errors = Vec::new();

        if let Some(email) = output.get("email") {
            if !email.as_str().is_some_and(|s| s.contains('@')) {
                errors.push(ValidationError::new(
                    vec!["email".into()],
                    "is in invalid format",
                    email.clone(),
                ));
            }
        }

        Validation { output, errors }
    }
}

#[tokio::test]
async fn test_contract_filter_strips_invalid_values_from_the_result() {
    let registry = TaskRegistry::new();
    registry.register("fetch_profile", |_| async {
        Ok(json!({"name": "ian", "email": "not-an-email"}))
    });

    let filter = ContractFilter::new(EmailContract).unwrap();
    let workflow = Workflow::builder()
        .root_task("fetch_profile")
        .resolver(registry)
        .aggregator(DeepMerge::new().with_filter(filter))
        .build()
        .unwrap();

    let result = workflow.run(json!({"id": 7})).await.unwrap();
    assert_eq!(result, json!({"id": 7, "name": "ian"}));
}

#[tokio::test]
async fn test_merge_input_disabled_drops_the_original_input() {
    let registry = TaskRegistry::new();
    registry.register("fetch_user", |_| async { Ok(json!({"user": 1})) });

    let workflow = Workflow::builder()
        .root_task("fetch_user")
        .resolver(registry)
        .aggregator(DeepMerge::new().merge_input(false))
        .build()
        .unwrap();

    let result = workflow.run(json!({"id": 7})).await.unwrap();
    assert_eq!(result, json!({"user": 1}));
}

#[tokio::test]
async fn test_final_merge_covers_all_batches_without_input() {
    let registry = TaskRegistry::new();
    registry.register("fetch_catalog", |_| async { Ok(json!({"catalog": 1})) });
    registry.register("fetch_prices", |_| async { Ok(json!({"prices": 2})) });

    let workflow = Workflow::builder()
        .root_task("fetch_catalog")
        .task("fetch_prices", ["fetch_catalog"])
        .resolver(registry)
        .aggregator(DeepMerge::new().merge_input(false))
        .build()
        .unwrap();

    // With the input excluded from the merge, the final value must still
    // carry every batch's output, not just the last chained one
    let result = workflow.run(json!({"id": 7})).await.unwrap();
    assert_eq!(result, json!({"catalog": 1, "prices": 2}));
}

#[tokio::test]
async fn test_dot_export_describes_the_graph() {
    let workflow = Workflow::builder()
        .root_task("one")
        .task("two", ["one"])
        .task("three", ["one"])
        .task("four", ["two", "three"])
        .resolver(TaskRegistry::new())
        .build()
        .unwrap();

    assert_eq!(
        workflow.to_dot(),
        "digraph TaskGraph {\n  one -> two;\n  one -> three;\n  two -> four;\n  three -> four;\n}\n"
    );
}

#[tokio::test]
async fn test_empty_workflow_returns_the_input() {
    let workflow = Workflow::builder()
        .resolver(TaskRegistry::new())
        .build()
        .unwrap();

    let result = workflow.run(json!({"foo": "bar"})).await.unwrap();
    assert_eq!(result, json!({"foo": "bar"}));
}

#[tokio::test]
async fn test_workflow_is_reusable_across_runs() {
    let registry = TaskRegistry::new();
    registry.register("echo_id", |input| async move {
        Ok(json!({"seen": input["id"]}))
    });

    let workflow = Workflow::builder()
        .root_task("echo_id")
        .resolver(registry)
        .build()
        .unwrap();

    let first = workflow.run(json!({"id": 1})).await.unwrap();
    let second = workflow.run(json!({"id": 2})).await.unwrap();
    assert_eq!(first["seen"], 1);
    assert_eq!(second["seen"], 2);
}

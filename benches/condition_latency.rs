use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::sync::Arc;

use efrup::codec::{encode_conditions, ConditionDecoder, ProtobufDecoder};
use efrup::config::EvaluatorConfig;
use efrup::domain::{Condition, ConditionType, Perspective, PerspectiveRole};
use efrup::evaluator::{resolve_sub_rule_ref, sanitize_conditions, ConditionEvaluator};
use efrup::publish::RecordingPublisher;
use efrup::store::MemoryConditionStore;

const TX_TYPE: &str = "pacs.002.001.12";

fn create_conditions(count: usize, role: PerspectiveRole) -> Vec<Condition> {
    let now = Utc::now();
    let types = [
        ConditionType::Override,
        ConditionType::OverridableBlock,
        ConditionType::NonOverridableBlock,
    ];

    (0..count)
        .map(|i| Condition {
            condition_type: types[i % types.len()].clone(),
            inception: now - Duration::days(30),
            expiry: if i % 4 == 0 {
                None
            } else {
                Some(now + Duration::days(i as i64 - 2))
            },
            perspectives: vec![Perspective::new(
                role.clone(),
                ["pacs.008.001.10", TX_TYPE],
            )],
        })
        .collect()
}

fn bench_sanitize(c: &mut Criterion) {
    let creditor = create_conditions(16, PerspectiveRole::GovernedAsCreditorBy);
    let debtor = create_conditions(16, PerspectiveRole::GovernedAsDebtorAccountBy);
    let now = Utc::now();

    c.bench_function("sanitize_conditions_32", |b| {
        b.iter(|| {
            sanitize_conditions(
                black_box(&creditor),
                black_box(&debtor),
                black_box(now),
                black_box(TX_TYPE),
            )
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    let applicable = vec![
        ConditionType::Override,
        ConditionType::OverridableBlock,
        ConditionType::Override,
    ];

    c.bench_function("resolve_sub_rule_ref", |b| {
        b.iter(|| resolve_sub_rule_ref(black_box(&applicable)))
    });
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode_conditions(&create_conditions(8, PerspectiveRole::GovernedAsCreditorBy));
    let decoder = ProtobufDecoder::new();

    c.bench_function("protobuf_decode_8", |b| {
        b.iter(|| decoder.decode(black_box(&bytes)))
    });
}

fn bench_full_evaluation(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let store = Arc::new(MemoryConditionStore::new());
    store.insert(
        "entities/default/cdtr",
        encode_conditions(&create_conditions(4, PerspectiveRole::GovernedAsCreditorBy)),
    );
    store.insert(
        "accounts/default/dbtr-acct",
        encode_conditions(&create_conditions(4, PerspectiveRole::GovernedAsDebtorAccountBy)),
    );

    let evaluator = ConditionEvaluator::new(
        EvaluatorConfig {
            suppress_alerts: true,
            ..Default::default()
        },
        store,
        Arc::new(ProtobufDecoder::new()),
        Arc::new(RecordingPublisher::new()),
    );

    let message = json!({
        "transaction": {
            "TxTp": TX_TYPE,
            "FIToFIPmtSts": { "GrpHdr": { "MsgId": "m1", "CreDtTm": Utc::now().to_rfc3339() } }
        },
        "DataCache": {
            "cdtrId": "cdtr",
            "dbtrId": "dbtr",
            "cdtrAcctId": "cdtr-acct",
            "dbtrAcctId": "dbtr-acct"
        }
    });

    // RecordingPublisher retains every published message
    let mut group = c.benchmark_group("evaluation");
    group.sample_size(50);
    group.bench_function("handle_transaction", |b| {
        b.to_async(&rt)
            .iter(|| evaluator.handle_transaction(black_box(message.clone())))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_sanitize,
    bench_resolve,
    bench_decode,
    bench_full_evaluation,
);

criterion_main!(benches);

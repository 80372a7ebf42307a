//! Benchmarks for chart query interpretation and aggregation
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use learnify_charts::query::{build_pipeline, AggregationIntent, QueryInterpreter};
use learnify_charts::store::{parse_students_csv, Field, MemoryStore, StudentRecord};

const QUERIES: [&str; 5] = [
    "students with age more than 17",
    "gpa less than 2.5",
    "average GPA by GradeClass",
    "how do absences vary by parental support",
    "gpa",
];

fn create_test_students(count: usize) -> Vec<StudentRecord> {
    (0..count)
        .map(|i| {
            StudentRecord::new()
                .field("StudentID", 1000 + i as i64)
                .field("Age", 15 + (i % 4) as i64)
                .field("Absences", (i % 30) as i64)
                .field("ParentalSupport", (i % 5) as i64)
                .field("GPA", (i % 40) as f64 / 10.0)
                .field("GradeClass", (i % 5) as f64)
        })
        .collect()
}

fn bench_interpret(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpret");
    let interpreter = QueryInterpreter::standard().unwrap();

    for query in QUERIES {
        group.bench_function(query, |b| {
            b.iter(|| interpreter.interpret(black_box(query)).unwrap())
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let intent = AggregationIntent::new(Some(Field::GradeClass), Field::Gpa);
    let pipeline = build_pipeline(&intent, 10);

    for size in [100, 1000, 10000] {
        let store = MemoryStore::new(create_test_students(size));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("gpa_by_gradeclass_{}", size), |b| {
            b.iter(|| store.run_pipeline(black_box(&pipeline)).unwrap())
        });
    }

    group.finish();
}

fn bench_csv_parse(c: &mut Criterion) {
    let mut data = String::from("StudentID,Age,Gender,StudyTimeWeekly,Absences,GPA,GradeClass\n");
    for i in 0..1000 {
        data.push_str(&format!(
            "{},{},{},{:.2},{},{:.2},{}.0\n",
            1000 + i,
            15 + i % 4,
            i % 2,
            (i % 20) as f64 * 0.97,
            i % 30,
            (i % 40) as f64 / 10.0,
            i % 5
        ));
    }

    let mut group = c.benchmark_group("csv");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("parse_1000", |b| {
        b.iter(|| parse_students_csv(black_box(&data)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_interpret, bench_aggregate, bench_csv_parse);
criterion_main!(benches);

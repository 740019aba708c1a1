//! Performance benchmarks for the center payroll engine.
//!
//! - One teacher salary through the HTTP API
//! - Salary generation for a 40-teacher roster through the API
//! - Monthly roll-up and vault balance over a year of rows
//! - Teacher ledger over a year of payments
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use center_payroll::api::{AppState, create_router};
use center_payroll::calculation::{monthly_rollup, teacher_ledger, vault_balance};
use center_payroll::config::ConfigLoader;
use center_payroll::models::{
    OtherExpense, PayMonth, Role, SalaryRecord, Student, StudentPayment, Teacher, WorkSchedule,
};
use center_payroll::store::InMemoryStore;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with loaded configuration and an empty store.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/center").expect("Failed to load config");
    AppState::new(config, Arc::new(InMemoryStore::new()))
}

/// A month of attendance for one teacher scheduled on Sundays and Tuesdays.
fn month_of_attendance(teacher_id: &str) -> Vec<Value> {
    (1..=28)
        .map(|day| {
            let status = match day % 7 {
                0 => "absent",
                3 => "late",
                _ => "present",
            };
            json!({
                "teacher_id": teacher_id,
                "record_date": format!("2026-01-{:02}", day),
                "status": status,
                "check_in": "16:15",
                "check_out": "21:10"
            })
        })
        .collect()
}

fn teacher_salary_request(teacher_id: &str) -> Value {
    json!({
        "teacher": {
            "id": teacher_id,
            "full_name": "خالد",
            "work_schedule": {
                "الأحد": { "from": "16:00", "to": "20:00" },
                "الثلاثاء": { "from": "16:00", "to": "20:00" }
            }
        },
        "month": 1,
        "year": 2026,
        "classes": [
            { "name": "حلقة", "teacher_id": teacher_id, "class_type": "متون", "duration_minutes": 240 },
            { "name": "تجويد", "teacher_id": teacher_id, "class_type": "تحفيظ وتجويد", "duration_minutes": 240 }
        ],
        "attendance": month_of_attendance(teacher_id)
    })
}

fn year_of_rows(count: usize) -> (Vec<StudentPayment>, Vec<SalaryRecord>, Vec<OtherExpense>, Vec<Student>) {
    let payments = (0..count)
        .map(|i| {
            let mut payment = StudentPayment::new("student", Decimal::from(300 + i % 50), Decimal::from(100));
            payment.student_id = Some(format!("s-{}", i % 200));
            payment.date = chrono::NaiveDate::from_ymd_opt(2026, (i % 12) as u32 + 1, (i % 28) as u32 + 1);
            payment.branch = Some(if i % 2 == 0 { "north" } else { "south" }.to_string());
            payment
        })
        .collect();
    let salaries = (0..count / 10)
        .map(|i| {
            let role = if i % 4 == 0 { Role::Sales } else { Role::Teacher };
            SalaryRecord::new("employee", role, Decimal::from(2000), Decimal::from(100), Decimal::from(50))
                .with_employee_id(format!("t-{}", i % 40))
                .for_period(PayMonth::new((i % 12) as u32 + 1, 2026).unwrap())
        })
        .collect();
    let expenses = (0..count / 5)
        .map(|i| {
            let mut expense = OtherExpense::new("rent", Decimal::from(75));
            expense.date = chrono::NaiveDate::from_ymd_opt(2026, (i % 12) as u32 + 1, 10);
            expense
        })
        .collect();
    let students = (0..200)
        .map(|i| Student {
            id: format!("s-{}", i),
            full_name: format!("student {}", i),
            teacher_id: Some(format!("t-{}", i % 40)),
            teacher_name: None,
            branch: None,
        })
        .collect();
    (payments, salaries, expenses, students)
}

/// Benchmark: One teacher salary through the API.
fn bench_teacher_salary(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = teacher_salary_request("t-1").to_string();

    c.bench_function("teacher_salary", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll/teacher-salary")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Salaries for a 40-teacher roster.
fn bench_roster(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();
    let requests: Vec<String> = (0..40)
        .map(|i| teacher_salary_request(&format!("t-{}", i)).to_string())
        .collect();

    let mut group = c.benchmark_group("roster");
    group.throughput(Throughput::Elements(40));
    group.bench_function("roster_40", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(40);
            for body in &requests {
                let router = create_router(state.clone());
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/payroll/teacher-salary")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body.clone()))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                results.push(response);
            }
            black_box(results)
        })
    });
    group.finish();
}

/// Benchmark: Monthly roll-up and vault balance at different row counts.
fn bench_rollup(c: &mut Criterion) {
    let period = PayMonth::new(6, 2026).unwrap();
    let mut group = c.benchmark_group("rollup");

    for count in [1_000usize, 10_000] {
        let (payments, salaries, expenses, _) = year_of_rows(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let rollup = monthly_rollup(&payments, &salaries, &expenses, period, Some("north"));
                let vault = vault_balance(&payments, &salaries, &expenses);
                black_box((rollup, vault))
            })
        });
    }
    group.finish();
}

/// Benchmark: Teacher ledger over a year of payments.
fn bench_ledger(c: &mut Criterion) {
    let (payments, salaries, _, students) = year_of_rows(10_000);
    let teachers: Vec<Teacher> = (0..40)
        .map(|i| Teacher {
            id: format!("t-{}", i),
            full_name: format!("teacher {}", i),
            branch: None,
            work_schedule: WorkSchedule::new(),
        })
        .collect();

    c.bench_function("ledger_10000", |b| {
        b.iter(|| black_box(teacher_ledger(&payments, &students, &salaries, &teachers)))
    });
}

criterion_group!(
    benches,
    bench_teacher_salary,
    bench_roster,
    bench_rollup,
    bench_ledger
);
criterion_main!(benches);

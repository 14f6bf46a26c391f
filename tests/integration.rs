//! Integration tests for the barbershop engine.
//!
//! This suite drives the public API end to end:
//! - Salary plans loaded from the sample configuration
//! - Payroll window and workday pro-ration
//! - Preset plans and package pricing
//! - The booking wizard: lock exclusion, lock expiry, persistence

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use barbershop_engine::booking::{
    BookingSession, BookingStore, FileStore, LockSweeper, ManualClock, MemoryStore,
    NotificationLevel, NotificationLog,
};
use barbershop_engine::calculation::{
    active_workday_ratio_for, calculate_dynamic_basic_plan, calculate_fixed_plan,
    calculate_package_price, calculate_salary, calculate_salary_from_plan,
    calculate_salary_with_trace, get_active_workday_ratio, get_payroll_window,
};
use barbershop_engine::config::{BookingConfig, ConfigLoader};
use barbershop_engine::error::EngineError;
use barbershop_engine::models::{
    BookingStep, CustomerDetails, DynamicField, LockState, PersistedBooking, SalaryPlan,
    SelectedService,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn loader() -> ConfigLoader {
    ConfigLoader::load("./config/barbershop").expect("Failed to load config")
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn service(id: &str, price: &str) -> SelectedService {
    SelectedService {
        id: id.to_string(),
        name: id.to_string(),
        price: decimal(price),
        duration_minutes: 30,
    }
}

struct Wizard {
    session: BookingSession,
    store: MemoryStore,
    log: NotificationLog,
    clock: Arc<ManualClock>,
}

fn wizard_with(config: BookingConfig, store: MemoryStore) -> Wizard {
    let log = NotificationLog::new();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
    ));
    let session = BookingSession::restore(
        config,
        Box::new(store.clone()),
        Box::new(log.clone()),
        clock.clone(),
    );
    Wizard {
        session,
        store,
        log,
        clock,
    }
}

fn wizard() -> Wizard {
    wizard_with(loader().booking().clone(), MemoryStore::new())
}

// =============================================================================
// Salary plans from configuration
// =============================================================================

#[test]
fn test_default_plan_from_config_matches_builtin() {
    let loader = loader();
    let plan = loader.get_plan("default").unwrap();
    let bonuses = vec![
        DynamicField::new("Eid bonus", decimal("200")),
        DynamicField::new("Referral", decimal("50")),
    ];

    let result = calculate_salary_from_plan(decimal("12500"), plan, &[], &bonuses);

    assert_eq!(result.basic_salary, decimal("2000"));
    assert_eq!(result.commission, decimal("1700"));
    assert_eq!(result.target_bonus, decimal("500"));
    assert_eq!(result.total_bonuses, decimal("250"));
    assert_eq!(result.total, decimal("4450"));

    let builtin = calculate_salary(decimal("12500"), &[], &bonuses, None);
    assert_eq!(builtin, result);
}

#[test]
fn test_senior_plan_from_config() {
    let loader = loader();
    let plan = loader.get_plan("dynamic_commission").unwrap();

    let result = calculate_salary_from_plan(decimal("10000"), plan, &[], &[]);

    assert_eq!(result.basic_salary, decimal("2500"));
    assert_eq!(result.target_bonus, decimal("300"));
    assert_eq!(result.commission, decimal("1750"));
    assert_eq!(result.total, decimal("4550"));
}

#[test]
fn test_fixed_plan_from_config_ignores_sales() {
    let loader = loader();
    let plan = loader.get_plan("fixed").unwrap();

    for sales in ["0", "4000", "25000"] {
        let result = calculate_salary_from_plan(decimal(sales), plan, &[], &[]);
        assert_eq!(result.basic_salary, decimal("3750"));
        assert_eq!(result.commission, Decimal::ZERO);
        assert_eq!(result.total, decimal("3750"));
    }
}

#[test]
fn test_employee_plan_without_config_uses_default() {
    let plan = SalaryPlan {
        id: Some("plan-7".to_string()),
        name: "Unconfigured".to_string(),
        config: None,
    };

    let result = calculate_salary(decimal("5000"), &[], &[], Some(&plan));

    assert_eq!(result.commission, decimal("200"));
    assert_eq!(result.total, decimal("2200"));
}

#[test]
fn test_trace_covers_every_block() {
    let loader = loader();
    let plan = loader.get_plan("default").unwrap();

    let breakdown = calculate_salary_with_trace(decimal("15000"), plan, &[], &[]);

    assert_eq!(breakdown.audit_steps.len(), plan.blocks.len() + 1);
    assert_eq!(breakdown.result.target_bonus, decimal("1000"));
    let numbers: Vec<u32> = breakdown.audit_steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_unknown_plan_name_is_reported() {
    match loader().get_plan("weekend_special") {
        Err(EngineError::PlanNotFound { name }) => assert_eq!(name, "weekend_special"),
        other => panic!("Expected PlanNotFound, got {:?}", other),
    }
}

// =============================================================================
// Payroll window and pro-ration
// =============================================================================

#[test]
fn test_march_window_bounds() {
    let window = get_payroll_window("2025-03").unwrap();

    assert_eq!(
        window.window_start,
        Utc.with_ymd_and_hms(2025, 2, 26, 0, 0, 0).unwrap()
    );
    assert_eq!(
        window.window_end,
        Utc.with_ymd_and_hms(2025, 3, 25, 23, 59, 59).unwrap() + Duration::milliseconds(999)
    );
}

#[test]
fn test_january_window_rolls_back_year() {
    let window = get_payroll_window("2025-01").unwrap();
    assert_eq!(window.window_start_date, "2024-12-26");
    assert_eq!(window.window_end_date, "2025-01-25");
}

#[test]
fn test_malformed_month_is_rejected() {
    assert!(matches!(
        get_payroll_window("March"),
        Err(EngineError::InvalidMonth { .. })
    ));
}

#[test]
fn test_ratio_boundaries() {
    let window = get_payroll_window("2025-03").unwrap();

    assert_eq!(
        get_active_workday_ratio(None, None, window.window_start, window.window_end),
        Decimal::ONE
    );
    assert_eq!(
        active_workday_ratio_for(None, Some("2025-01-31"), &window),
        Decimal::ZERO
    );
    assert_eq!(
        get_active_workday_ratio(
            Some(window.window_start),
            Some(window.window_end),
            window.window_start,
            window.window_end
        ),
        Decimal::ONE
    );
}

#[test]
fn test_mid_window_hire_prorates_salary() {
    let window = get_payroll_window("2025-03").unwrap();

    // Hired 2025-03-12: 14 of 28 days active
    let ratio = active_workday_ratio_for(Some("2025-03-12"), None, &window);
    assert_eq!(ratio, decimal("0.5"));

    let salary = calculate_salary(decimal("5000"), &[], &[], None);
    assert_eq!(salary.total * ratio, decimal("1100"));
}

// =============================================================================
// Preset plans and package pricing
// =============================================================================

#[test]
fn test_preset_plans() {
    assert_eq!(calculate_fixed_plan().total_salary, decimal("3750"));
    assert_eq!(
        calculate_dynamic_basic_plan(decimal("5399")).total_salary,
        decimal("500")
    );
    assert_eq!(
        calculate_dynamic_basic_plan(decimal("5400")).total_salary,
        decimal("550")
    );
    assert_eq!(calculate_dynamic_basic_plan(decimal("7000")).increments, decimal("5"));
}

#[test]
fn test_package_pricing_with_configured_tiers() {
    let loader = loader();
    let tiers = &loader.booking().package_discounts;

    let single = calculate_package_price(&[decimal("80")], tiers);
    assert_eq!(single.total, decimal("80"));

    let trio = calculate_package_price(&[decimal("80"), decimal("45"), decimal("35")], tiers);
    assert_eq!(trio.discount_percent, decimal("15"));
    assert_eq!(trio.discount_amount, decimal("24"));
    assert_eq!(trio.total, decimal("136"));
}

// =============================================================================
// Booking wizard
// =============================================================================

#[test]
fn test_back_to_back_step_changes_only_one_wins() {
    let mut w = wizard();

    let first = w.session.initiate_step_change(
        BookingStep::Services,
        BookingStep::Datetime,
        "next-button",
    );
    let second =
        w.session
            .initiate_step_change(BookingStep::Services, BookingStep::Barber, "step-tab");

    assert!(first);
    assert!(!second);
    assert_eq!(w.session.state().current_step, BookingStep::Datetime);
    assert_eq!(w.session.state().transaction_history.len(), 1);
}

#[test]
fn test_expired_lock_is_swept_without_release() {
    let mut w = wizard();
    assert!(w.session.initiate_step_change(
        BookingStep::Services,
        BookingStep::Datetime,
        "next-button"
    ));

    w.clock.advance(Duration::milliseconds(5000));
    assert!(w.session.sweep_expired_lock());
    assert_eq!(w.session.state().lock, LockState::Idle);

    assert!(w.session.initiate_step_change(
        BookingStep::Datetime,
        BookingStep::Barber,
        "next-button"
    ));
    assert_eq!(w.session.state().current_step, BookingStep::Barber);
}

#[tokio::test(start_paused = true)]
async fn test_background_sweeper_releases_abandoned_lock() {
    let w = wizard();
    let clock = w.clock.clone();
    let session = Arc::new(tokio::sync::Mutex::new(w.session));
    let sweeper = LockSweeper::for_session(session.clone()).await;

    assert!(session.lock().await.initiate_step_change(
        BookingStep::Services,
        BookingStep::Datetime,
        "next-button"
    ));

    clock.advance(Duration::milliseconds(5000));
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    {
        let mut guard = session.lock().await;
        assert_eq!(guard.state().lock, LockState::Idle);
        assert!(guard.initiate_step_change(
            BookingStep::Datetime,
            BookingStep::Barber,
            "next-button"
        ));
    }

    assert!(sweeper.is_running());
    sweeper.stop();
}

#[test]
fn test_persisted_date_survives_rehydration() {
    let store = MemoryStore::new();
    let date = Utc.with_ymd_and_hms(2025, 4, 2, 14, 30, 0).unwrap();

    let mut w = wizard_with(BookingConfig::default(), store.clone());
    w.session.set_services(vec![service("haircut", "60")]);
    w.session.set_date(Some(date));
    assert!(w.session.initiate_step_change(
        BookingStep::Services,
        BookingStep::Datetime,
        "next-button"
    ));

    let raw = w.store.get("booking-state").unwrap();
    let persisted: PersistedBooking = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.selected_date, Some(date));

    let restored = wizard_with(BookingConfig::default(), store);
    let state = restored.session.state();
    assert_eq!(state.selected_date, Some(date));
    assert_eq!(state.current_step, BookingStep::Datetime);
    assert_eq!(state.lock, LockState::Idle);
    assert!(state.pending_transactions.is_empty());
    assert!(state.transaction_history.is_empty());
}

#[test]
fn test_file_store_backs_session_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let config = BookingConfig::default();

    {
        let mut session = BookingSession::restore(
            config.clone(),
            Box::new(FileStore::new(dir.path())),
            Box::new(NotificationLog::new()),
            Arc::new(ManualClock::new(Utc::now())),
        );
        session.set_barber(Some("barber-3".to_string()));
        session.teardown();
    }

    let store = FileStore::new(dir.path());
    assert!(store.load(&config.storage_key).unwrap().is_some());

    let session = BookingSession::restore(
        config,
        Box::new(store),
        Box::new(NotificationLog::new()),
        Arc::new(ManualClock::new(Utc::now())),
    );
    assert_eq!(
        session.state().selected_barber.as_deref(),
        Some("barber-3")
    );
}

#[test]
fn test_full_wizard_walkthrough() {
    let mut w = wizard();
    w.session.set_branch(Some("riyadh-olaya".to_string()));
    w.session
        .set_services(vec![service("haircut", "80"), service("beard", "40")]);

    let steps = [
        BookingStep::Services,
        BookingStep::Datetime,
        BookingStep::Barber,
        BookingStep::Details,
        BookingStep::Summary,
    ];
    for pair in steps.windows(2) {
        match pair[1] {
            BookingStep::Datetime => {
                w.session.set_date(Some(Utc.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap()));
                w.session.set_time(Some("16:30".to_string()));
            }
            BookingStep::Barber => {
                w.session.set_barber(Some("barber-1".to_string()));
            }
            BookingStep::Details => {
                w.session.set_customer_details(CustomerDetails {
                    name: "Faisal".to_string(),
                    phone: "+966500000000".to_string(),
                    ..CustomerDetails::default()
                });
            }
            _ => {}
        }
        assert!(w.session.initiate_step_change(pair[0], pair[1], "next-button"));
        w.clock.advance(Duration::milliseconds(5000));
        w.session.sweep_expired_lock();
    }

    let state = w.session.state();
    assert_eq!(state.current_step, BookingStep::Summary);
    assert_eq!(state.transaction_history.len(), 4);
    assert_eq!(w.session.basket_price().total, decimal("108"));
    assert!(
        w.log
            .entries()
            .iter()
            .all(|n| n.level != NotificationLevel::Error)
    );
}

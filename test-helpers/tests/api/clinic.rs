use jiff::SignedDuration;
use payloads::{
    requests,
    responses::{AppointmentStatus, InventorySlipKind, PaymentStatus},
};
use reqwest::StatusCode;

use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn appointments_filter_by_status() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_manager().await?;

    let all = app
        .client
        .list_appointments(&requests::AppointmentFilter::default())
        .await?;
    assert_eq!(all.len(), 3);

    let filter = requests::AppointmentFilter {
        status: Some(AppointmentStatus::Pending),
        ..Default::default()
    };
    let pending = app.client.list_appointments(&filter).await?;
    assert_eq!(pending, vec![app.dataset.pending_appointment.clone()]);

    Ok(())
}

#[tokio::test]
async fn appointments_filter_by_date() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_doctor().await?;

    // the completed appointment was a month ago; the others are upcoming
    let filter = requests::AppointmentFilter {
        from: Some("2025-03-01".parse()?),
        to: Some("2025-03-31".parse()?),
        ..Default::default()
    };
    let upcoming = app.client.list_appointments(&filter).await?;
    assert_eq!(upcoming.len(), 2);
    assert!(
        upcoming
            .iter()
            .all(|a| a.status != AppointmentStatus::Completed)
    );

    Ok(())
}

#[tokio::test]
async fn customer_books_and_cancels() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_customer().await?;

    let details = requests::RegisterAppointment {
        service_id: app.dataset.flu_service.id,
        scheduled_at: app.time_source.now() + SignedDuration::from_hours(48),
        note: Some("Morning please".into()),
    };
    let appointment = app.client.register_appointment(&details).await?;
    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.customer_id, app.dataset.customer_id);

    app.client.cancel_appointment(&appointment.id).await?;
    let result = app.client.cancel_appointment(&appointment.id).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn booking_in_the_past_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_customer().await?;

    let details = requests::RegisterAppointment {
        service_id: app.dataset.flu_service.id,
        scheduled_at: app.time_source.now() - SignedDuration::from_hours(1),
        note: None,
    };
    let result = app.client.register_appointment(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn approval_needs_full_access() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let pending = app.dataset.pending_appointment.id;

    app.login_customer().await?;
    let result = app.client.approve_appointment(&pending).await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    app.login_doctor().await?;
    let approved = app.client.approve_appointment(&pending).await?;
    assert_eq!(approved.status, AppointmentStatus::Approved);

    let result = app.client.approve_appointment(&pending).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn payment_completes_appointment() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_manager().await?;

    let details = requests::CreatePayment {
        appointment_id: app.dataset.approved_appointment.id,
        method: requests::PaymentMethod::Card,
    };
    let payment = app.client.create_payment(&details).await?;
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.amount, app.dataset.hepatitis_service.price);

    let filter = requests::AppointmentFilter {
        status: Some(AppointmentStatus::Completed),
        ..Default::default()
    };
    assert_eq!(app.client.list_appointments(&filter).await?.len(), 2);

    // pending appointments cannot be charged
    let details = requests::CreatePayment {
        appointment_id: app.dataset.pending_appointment.id,
        method: requests::PaymentMethod::Cash,
    };
    let result = app.client.create_payment(&details).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn customer_sees_only_own_plans() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_customer().await?;

    let plans = app
        .client
        .list_vaccination_plans(&requests::PlanFilter::default())
        .await?;
    assert_eq!(plans, vec![app.dataset.plan.clone()]);

    let result = app
        .client
        .record_dose(&requests::RecordDose {
            plan_id: app.dataset.plan.id,
            dose_number: 2,
            vaccine_lot_id: app.dataset.usable_lot.id,
        })
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn recording_a_dose_draws_from_the_lot() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_doctor().await?;
    let plan_id = app.dataset.plan.id;
    let lot = &app.dataset.usable_lot;

    // doses go in order
    let result = app
        .client
        .record_dose(&requests::RecordDose {
            plan_id,
            dose_number: 3,
            vaccine_lot_id: lot.id,
        })
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    // expired lots are refused
    let result = app
        .client
        .record_dose(&requests::RecordDose {
            plan_id,
            dose_number: 2,
            vaccine_lot_id: app.dataset.expired_lot.id,
        })
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    let plan = app
        .client
        .record_dose(&requests::RecordDose {
            plan_id,
            dose_number: 2,
            vaccine_lot_id: lot.id,
        })
        .await?;
    assert_eq!(plan.next_dose().map(|dose| dose.dose_number), Some(3));

    let lots = app.client.list_vaccine_lots().await?;
    let remaining = lots.iter().find(|l| l.id == lot.id).map(|l| l.quantity);
    assert_eq!(remaining, Some(lot.quantity - 1));

    Ok(())
}

#[tokio::test]
async fn slips_follow_their_own_permission() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let lot = &app.dataset.usable_lot;
    app.login_doctor().await?;

    let slip = |kind, quantity| requests::CreateInventorySlip {
        kind,
        vaccine_lot_id: lot.id,
        quantity,
        note: None,
    };

    // the doctor may export but not import
    let result = app
        .client
        .create_inventory_slip(&slip(InventorySlipKind::Import, 10))
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    let created = app
        .client
        .create_inventory_slip(&slip(InventorySlipKind::Export, 5))
        .await?;
    assert_eq!(created.kind, InventorySlipKind::Export);

    let result = app
        .client
        .create_inventory_slip(&slip(InventorySlipKind::Export, 1000))
        .await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    app.login_manager().await?;
    app.client
        .create_inventory_slip(&slip(InventorySlipKind::Import, 10))
        .await?;
    let lots = app.client.list_vaccine_lots().await?;
    let quantity = lots.iter().find(|l| l.id == lot.id).map(|l| l.quantity);
    assert_eq!(quantity, Some(lot.quantity - 5 + 10));

    Ok(())
}

#[tokio::test]
async fn statistics_are_manager_only() -> anyhow::Result<()> {
    let app = spawn_app().await;

    app.login_doctor().await?;
    let result = app
        .client
        .statistics_overview(&requests::StatisticsRange::default())
        .await;
    assert_status_code(result, StatusCode::FORBIDDEN);

    app.login_manager().await?;
    let overview = app
        .client
        .statistics_overview(&requests::StatisticsRange::default())
        .await?;
    assert_eq!(overview.appointments, 3);
    assert_eq!(overview.doses_administered, 1);
    assert_eq!(overview.new_customers, 1);

    Ok(())
}

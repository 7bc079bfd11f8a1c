//! Sample farm data for the demo backend and tests.

use chrono::{Duration, Utc};
use farm_client::*;

/// A plot with the given status and no other details.
pub fn plot(id: Id, name: &str, status: &str) -> Plot {
    Plot {
        id,
        name: name.to_string(),
        acreage: 1.0,
        location: None,
        status: PlotStatus::from(status),
        caretaker: None,
        caretaker_id: None,
        current_crop: None,
        current_crop_id: None,
        planted_date: None,
        expected_harvest_date: None,
        notes: None,
        last_activity: None,
    }
}

fn seeded(
    id: Id,
    name: &str,
    acreage: f64,
    crop: (Id, &str),
    caretaker: (Id, &str),
    status: &str,
    planted_days_ago: i64,
) -> Plot {
    let planted = Utc::now().date_naive() - Duration::days(planted_days_ago);
    Plot {
        acreage,
        caretaker: Some(CaretakerRef::Record {
            id: Some(caretaker.0),
            name: caretaker.1.to_string(),
        }),
        caretaker_id: Some(caretaker.0),
        current_crop: Some(CropRef::Record {
            id: Some(crop.0),
            name: crop.1.to_string(),
        }),
        current_crop_id: Some(crop.0),
        planted_date: Some(planted.format("%Y-%m-%d").to_string()),
        ..plot(id, name, status)
    }
}

/// Four plots covering the main statuses, in server order.
pub fn sample_plots() -> Vec<Plot> {
    vec![
        seeded(1, "North Field A", 5.2, (1, "Wheat"), (1, "John Smith"), "growing", 5),
        seeded(2, "South Field B", 3.8, (2, "Corn"), (2, "Maria Garcia"), "ready", 110),
        seeded(3, "East Field C", 4.1, (3, "Tomatoes"), (3, "David Chen"), "planting", 12),
        seeded(4, "West Field D", 2.6, (4, "Rice"), (1, "John Smith"), "harvested", 3),
    ]
}

pub fn sample_weather() -> Weather {
    Weather {
        temperature: 24.0,
        expected_rain: 12.0,
        humidity: Some(65.0),
        status: Some("Partly cloudy with chance of rain".to_string()),
    }
}

pub fn sample_crops() -> Vec<Crop> {
    let crop = |id: Id, name: &str, urdu: &str, category: Option<CropCategory>| Crop {
        id,
        name: name.to_string(),
        name_urdu: Some(urdu.to_string()),
        variety: None,
        category,
    };
    vec![
        crop(1, "Wheat", "گندم", Some(CropCategory::MajorCrops)),
        crop(2, "Corn", "مکئی", Some(CropCategory::MajorCrops)),
        crop(3, "Tomatoes", "ٹماٹر", Some(CropCategory::Vegetables)),
        crop(4, "Rice", "چاول", None),
        crop(5, "Chickpea", "چنا", Some(CropCategory::PulsesLegumes)),
        crop(6, "Mustard", "سرسوں", Some(CropCategory::Oilseeds)),
    ]
}

pub fn sample_caretakers() -> Vec<Caretaker> {
    vec![
        Caretaker {
            id: 1,
            name: "John Smith".to_string(),
            phone: None,
        },
        Caretaker {
            id: 2,
            name: "Maria Garcia".to_string(),
            phone: None,
        },
        Caretaker {
            id: 3,
            name: "David Chen".to_string(),
            phone: None,
        },
    ]
}

/// An open watering reminder.
pub fn reminder(id: Id, plot_id: Id, due_date: &str) -> Reminder {
    Reminder {
        id,
        plot_id,
        crop_id: None,
        reminder_type: ReminderType::Watering,
        due_date: due_date.to_string(),
        sent: false,
        message: None,
    }
}

/// Reminders due over the coming days.
pub fn sample_reminders() -> Vec<Reminder> {
    let due = |days: i64| (Utc::now() + Duration::days(days)).to_rfc3339();
    vec![
        Reminder {
            reminder_type: ReminderType::Fertilizer,
            ..reminder(1, 1, &due(1))
        },
        Reminder {
            reminder_type: ReminderType::Harvest,
            ..reminder(2, 2, &due(4))
        },
        reminder(3, 3, &due(9)),
        Reminder {
            reminder_type: ReminderType::Spray,
            ..reminder(4, 1, &due(3))
        },
    ]
}

pub fn sample_lifecycles() -> Vec<LifecycleEvent> {
    let event = |id: Id, plot_id: Id, event_type, title: &str, days_ago: i64| LifecycleEvent {
        id: Some(id),
        plot_id,
        crop_id: None,
        event_type,
        title: title.to_string(),
        description: None,
        date: Some(
            (Utc::now().date_naive() - Duration::days(days_ago))
                .format("%Y-%m-%d")
                .to_string(),
        ),
        notes: None,
        yield_amount: None,
        yield_unit: None,
    };
    vec![
        event(1, 1, LifecycleEventType::Planting, "Sowed wheat", 5),
        event(2, 1, LifecycleEventType::Irrigation, "First irrigation", 2),
        event(3, 4, LifecycleEventType::Harvesting, "Rice harvest", 3),
    ]
}

/// Backend pre-loaded with every sample set.
pub fn demo_backend() -> crate::backend::MockBackend {
    crate::backend::MockBackend::new()
        .with_plots(sample_plots())
        .with_weather(sample_weather())
        .with_crops(sample_crops())
        .with_caretakers(sample_caretakers())
        .with_reminders(sample_reminders())
        .with_lifecycles(sample_lifecycles())
}

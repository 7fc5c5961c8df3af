#![allow(missing_docs, clippy::unwrap_used)]
use chrono::{DateTime, Offset, TimeZone, Utc};
use geocelestial::{
    calculate_celestial, CelestialOptions, CelestialStatus, GeoConfig, MgrsCoordinate, ObserverLocation, UtmCoordinate,
};
use std::time::{SystemTime, UNIX_EPOCH};

fn print_event(label: &str, event: Option<DateTime<Utc>>, condition: CelestialStatus) {
    match (event, condition) {
        (Some(instant), _) => println!(
            "  {label:<20} {}",
            instant.with_timezone(&chrono_tz::America::New_York).format("%H:%M:%S %Z")
        ),
        (None, CelestialStatus::UpAllDay) => println!("  {label:<20} (up all day)"),
        (None, CelestialStatus::DownAllDay) => println!("  {label:<20} (down all day)"),
        (None, _) => println!("  {label:<20} (none today)"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Trenton, NJ
    let trenton = ObserverLocation::new(40.0352, -74.5844)?;

    let now_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| "System time is before Unix epoch")?
        .as_secs() as i64;
    let now = Utc.timestamp_opt(now_timestamp, 0).single().ok_or("Invalid timestamp")?;
    let local_now = now.with_timezone(&chrono_tz::America::New_York);
    let offset = local_now.offset().fix();

    println!("Almanac - Trenton, NJ");
    println!(
        "Location: {:.4}°N, {:.4}°W",
        trenton.latitude(),
        trenton.longitude().abs()
    );
    println!("Date: {} (UTC{})", local_now.format("%B %d, %Y"), offset);
    println!("UTM:  {}", UtmCoordinate::from_location(trenton, &GeoConfig::DEFAULT));
    println!("MGRS: {}", MgrsCoordinate::from_location(trenton, &GeoConfig::DEFAULT));
    println!("{:=<60}", "");

    let options = CelestialOptions {
        offset,
        ..Default::default()
    };
    let snapshot = calculate_celestial(trenton, now, &options);

    if let Some(sun) = snapshot.sun {
        println!("Sun");
        println!("  Altitude: {:.2}°  Azimuth: {:.2}°", sun.altitude, sun.azimuth);
        print_event("Astronomical dawn", sun.additional.astronomical_dawn, sun.condition);
        print_event("Nautical dawn", sun.additional.nautical_dawn, sun.condition);
        print_event("Civil dawn", sun.additional.civil_dawn, sun.condition);
        print_event("Sunrise", sun.rise, sun.condition);
        print_event("Solar noon", sun.additional.solar_noon, sun.condition);
        print_event("Sunset", sun.set, sun.condition);
        print_event("Civil dusk", sun.additional.civil_dusk, sun.condition);
        print_event("Nautical dusk", sun.additional.nautical_dusk, sun.condition);
        print_event("Astronomical dusk", sun.additional.astronomical_dusk, sun.condition);
        println!();
    }

    if let Some(moon) = snapshot.moon {
        println!("Moon");
        println!("  Altitude: {:.2}°  Azimuth: {:.2}°", moon.altitude, moon.azimuth);
        println!("  Distance: {:.0} km", moon.distance_km);
        println!(
            "  Phase: {} ({:.1}% lit)",
            moon.illumination.phase_name,
            moon.illumination.fraction * 100.0
        );
        print_event("Moonrise", moon.rise, moon.condition);
        print_event("Moonset", moon.set, moon.condition);
        println!();
    }

    if let Some(cycle) = snapshot.lunar_cycle {
        if let Some(perigee) = cycle.perigee.next {
            println!(
                "Next perigee: {} at {:.0} km",
                perigee.instant.with_timezone(&chrono_tz::America::New_York).format("%Y-%m-%d %H:%M %Z"),
                perigee.distance_km
            );
        }
        if let Some(apogee) = cycle.apogee.next {
            println!(
                "Next apogee:  {} at {:.0} km",
                apogee.instant.with_timezone(&chrono_tz::America::New_York).format("%Y-%m-%d %H:%M %Z"),
                apogee.distance_km
            );
        }
    }

    if let Some(extensions) = snapshot.extensions {
        println!("Sun sign: {}  Moon sign: {}", extensions.zodiac_sign, extensions.moon_sign);
        if let Some(name) = extensions.moon_name {
            println!("Tonight's full moon: {name}");
        }
    }

    Ok(())
}

use ridebook_core::Booking;

/// Plain-text ticket offered for download from the dashboard
pub fn render(booking: &Booking) -> String {
    let seats = booking
        .seats
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        "==============================".to_string(),
        "        RIDEBOOK TICKET".to_string(),
        "==============================".to_string(),
        format!("Booking ID : {}", booking.id),
        format!("Route      : {}", booking.route_name),
        format!("Date       : {}", booking.journey_date.format("%Y-%m-%d")),
        format!("Departure  : {}", booking.departure_time),
        format!("Seats      : {}", seats),
        format!("Passenger  : {}", booking.passenger.name),
        format!("Age        : {}", booking.passenger.age),
        format!("Phone      : {}", booking.passenger.phone.reveal()),
    ];
    if let Some(email) = &booking.passenger.email {
        lines.push(format!("Email      : {}", email));
    }
    lines.push(format!("Total      : ₹{}", booking.price));
    lines.push(format!("Status     : {}", booking.status.as_str().to_uppercase()));
    lines.push("==============================".to_string());
    lines.push("Please carry a valid ID proof.".to_string());

    lines.join("\n") + "\n"
}

pub fn file_name(booking: &Booking) -> String {
    format!("ticket-{}.txt", booking.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::booking;
    use ridebook_core::BookingStatus;

    #[test]
    fn test_ticket_fields() {
        let mut b = booking("b42", BookingStatus::Confirmed, 500, 3);
        b.seats = vec![8, 9];

        let text = render(&b);
        assert!(text.contains("Booking ID : b42"));
        assert!(text.contains("Route      : CBE - Erode Express"));
        assert!(text.contains("Date       : 2030-05-02"));
        assert!(text.contains("Seats      : 8, 9"));
        assert!(text.contains("Phone      : 9876500003"));
        assert!(text.contains("Total      : ₹500"));
        assert!(text.contains("Status     : CONFIRMED"));
        assert!(!text.contains("Email"));
        assert_eq!(file_name(&b), "ticket-b42.txt");
    }
}

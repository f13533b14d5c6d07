use crate::{Event, Movie, PriceType};

fn movie(title: &str, rating: &str, duration: &str, genre: &str, times: &[&str]) -> Movie {
    Movie {
        title: title.to_owned(),
        rating: rating.to_owned(),
        duration: duration.to_owned(),
        genre: genre.to_owned(),
        times: times.iter().map(|time| (*time).to_owned()).collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn event(
    title: &str,
    date: &str,
    day: &str,
    time: &str,
    venue: &str,
    description: &str,
    price: &str,
    price_type: PriceType,
) -> Event {
    Event {
        title: title.to_owned(),
        date: date.to_owned(),
        day: day.to_owned(),
        time: time.to_owned(),
        venue: venue.to_owned(),
        description: description.to_owned(),
        price: price.to_owned(),
        price_type,
    }
}

/// Showtimes served when the theater page can't be scraped.
pub fn fallback_movies() -> Vec<Movie> {
    vec![
        movie(
            "Guardians of the Galaxy Vol. 3",
            "PG-13",
            "2h 30m",
            "Action",
            &["2:00 PM", "5:30 PM", "8:45 PM"],
        ),
        movie(
            "The Little Mermaid",
            "PG",
            "2h 15m",
            "Musical",
            &["12:15 PM", "3:30 PM", "6:45 PM", "9:50 PM"],
        ),
        movie(
            "Spider-Man: Across the Spider-Verse",
            "PG-13",
            "2h 20m",
            "Animation",
            &["1:30 PM", "4:45 PM", "7:20 PM", "10:15 PM"],
        ),
    ]
}

/// Events served when there is no token or the search fails.
pub fn fallback_events() -> Vec<Event> {
    vec![
        event(
            "Honolulu Night Market",
            "JUN 15",
            "15",
            "5:00 PM - 10:00 PM",
            "Kakaako Waterfront Park",
            "Local vendors, food trucks, and live music",
            "Free",
            PriceType::Free,
        ),
        event(
            "Sunset Beach Concert Series",
            "JUN 17",
            "17",
            "7:00 PM - 9:00 PM",
            "Waikiki Beach",
            "Jazz fusion band featuring local artists",
            "$25",
            PriceType::Paid,
        ),
        event(
            "Hawaiian Cultural Festival",
            "JUN 20",
            "20",
            "10:00 AM - 6:00 PM",
            "Iolani Palace",
            "Traditional performances, crafts, and food",
            "$15",
            PriceType::Paid,
        ),
        event(
            "Diamond Head Sunrise Hike",
            "JUN 22",
            "22",
            "5:30 AM",
            "Diamond Head State Monument",
            "Guided group hike with photography workshop",
            "$35",
            PriceType::Premium,
        ),
        event(
            "Farmers Market & Craft Fair",
            "JUN 25",
            "25",
            "8:00 AM - 2:00 PM",
            "Kapiolani Park",
            "Fresh produce, handmade goods, and local treats",
            "Free",
            PriceType::Free,
        ),
    ]
}

//! Default category table

pub(super) const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "fruits",
        &[
            "banana", "apple", "orange", "grape", "kiwi", "mango", "pineapple", "strawberry",
            "blueberry", "peach",
        ],
    ),
    (
        "cricketers",
        &[
            "Sachin Tendulkar", "Virat Kohli", "Ricky Ponting", "MS Dhoni", "AB de Villiers",
            "Rohit Sharma", "Brian Lara", "Yuvraj Singh", "Chris Gayle", "Shane Warne",
        ],
    ),
    (
        "animals",
        &[
            "lion", "tiger", "elephant", "giraffe", "zebra", "kangaroo", "panda", "dolphin",
            "eagle", "penguin",
        ],
    ),
    (
        "countries",
        &[
            "India", "United States", "Canada", "Australia", "Brazil", "China", "Japan",
            "Germany", "Russia", "South Africa",
        ],
    ),
    (
        "sports",
        &[
            "soccer", "cricket", "basketball", "tennis", "hockey", "baseball", "golf", "rugby",
            "volleyball", "badminton",
        ],
    ),
    (
        "movies",
        &[
            "Inception", "Titanic", "Avatar", "The Dark Knight", "The Godfather", "Forrest Gump",
            "Jurassic Park", "Pulp Fiction", "The Matrix", "Interstellar",
        ],
    ),
    (
        "colors",
        &[
            "red", "blue", "green", "yellow", "purple", "orange", "pink", "black", "white",
            "brown",
        ],
    ),
    (
        "cars",
        &[
            "Toyota", "Ford", "BMW", "Mercedes", "Tesla", "Honda", "Audi", "Chevrolet",
            "Volkswagen", "Nissan",
        ],
    ),
    (
        "cities",
        &[
            "New York", "London", "Tokyo", "Paris", "Sydney", "Dubai", "Toronto", "Moscow",
            "Berlin", "Beijing",
        ],
    ),
    (
        "books",
        &[
            "Harry Potter", "The Lord of the Rings", "The Hobbit", "The Song of Fire and Ice",
            "50 shades of Grey", "The Geeta", "The Quran", "The Bible",
        ],
    ),
    (
        "vegetables",
        &[
            "carrot", "broccoli", "potato", "spinach", "tomato", "cucumber", "onion",
            "bell pepper", "garlic", "cauliflower",
        ],
    ),
    (
        "vehicles",
        &[
            "car", "bicycle", "motorcycle", "airplane", "train", "boat", "bus", "truck",
            "scooter", "helicopter",
        ],
    ),
    (
        "occupations",
        &[
            "doctor", "engineer", "teacher", "lawyer", "artist", "scientist", "police officer",
            "firefighter", "chef", "nurse",
        ],
    ),
    (
        "companies",
        &[
            "Apple", "Google", "Microsoft", "Amazon", "Facebook", "Tesla", "Samsung", "Intel",
            "IBM", "Netflix",
        ],
    ),
    (
        "planets",
        &[
            "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
            "Pluto", "Ceres",
        ],
    ),
    (
        "superheroes",
        &[
            "Spider-Man", "Superman", "Batman", "Wonder Woman", "Iron Man", "Captain America",
            "Thor", "Hulk", "Black Panther", "Flash",
        ],
    ),
];

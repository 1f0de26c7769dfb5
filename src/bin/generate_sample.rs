use std::path::PathBuf;

/// Continent → region → countries used for the synthetic roster.
const GEOGRAPHY: &[(&str, &str, &[&str])] = &[
    ("Europe", "Southern Europe", &["Portugal", "Spain", "Italy", "Greece"]),
    ("Europe", "Western Europe", &["France", "Germany", "Netherlands"]),
    ("Europe", "Northern Europe", &["Sweden", "Ireland"]),
    ("Asia", "Eastern Asia", &["Japan", "China", "South Korea"]),
    ("Asia", "Southern Asia", &["India", "Pakistan"]),
    ("Americas", "South America", &["Brazil", "Argentina"]),
    ("Americas", "Northern America", &["United States", "Canada"]),
    ("Africa", "Eastern Africa", &["Kenya", "Ethiopia"]),
];

const DEGREES: &[&str] = &["Bachelor", "Master", "Doctoral"];
const GENDERS: &[&str] = &["Female", "Male"];
const STATUSES: &[&str] = &["Student", "Researcher", "Professor"];
const MEMBERSHIPS: &[&str] = &["Paid", "Unpaid", "Honorary"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// True with probability `percent` / 100.
    fn chance(&mut self, percent: usize) -> bool {
        self.below(100) < percent
    }
}

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/csh_member_data.csv"));
    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).expect("Failed to create output directory");
    }

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");
    writer
        .write_record([
            "Continent",
            "Region",
            "Country",
            "Admission Date",
            "Academic Degree",
            "Gender",
            "Status",
            "Membership Status",
        ])
        .expect("Failed to write header");

    let n_members = 1200;
    for _ in 0..n_members {
        let (continent, region, countries) = GEOGRAPHY[rng.below(GEOGRAPHY.len())];
        let country = rng.pick(countries);

        // Later years admit more members.
        let year = 2015 + rng.below(10).max(rng.below(10));
        let date = if rng.chance(2) {
            "unknown".to_string()
        } else {
            format!("{:02}/{:02}/{year}", 1 + rng.below(28), 1 + rng.below(12))
        };

        let status = rng.pick(STATUSES);
        let degree = match status {
            "Professor" => "Doctoral",
            _ => rng.pick(DEGREES),
        };
        // A few blank cells, as in real exports.
        let gender = if rng.chance(3) { "" } else { rng.pick(GENDERS) };
        let membership = if rng.chance(5) { "" } else { rng.pick(MEMBERSHIPS) };

        writer
            .write_record([continent, region, country, date.as_str(), degree, gender, status, membership])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {n_members} members to {}", output_path.display());
}

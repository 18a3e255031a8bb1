//! Output formatting for CLI

use crate::{action::Action, ports::Controller, q_learning::Agent};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the value table of a controller, one state per line.
///
/// Controllers without a table print nothing and return `false`.
pub fn print_value_table(controller: &dyn Controller) -> bool {
    let Some(agent) = controller.as_any().downcast_ref::<Agent>() else {
        return false;
    };
    let table = agent.table();
    let encoder = agent.encoder();

    print_subsection("Value table");
    let header: Vec<String> = (0..table.num_actions())
        .map(|index| format!("{:>9}", Action::from_index(index).to_string()))
        .collect();
    println!("  {:>6} {:>16} {}", "state", "levels", header.join(" "));
    for state in 0..table.num_states() {
        let levels = format!("{:?}", encoder.decode(state));
        let values: Vec<String> = table
            .row(state)
            .iter()
            .map(|value| format!("{value:>9.3}"))
            .collect();
        println!("  {state:>6} {levels:>16} {}", values.join(" "));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }
}

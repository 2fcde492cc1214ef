//! Built-in example programs that can be loaded into the active tab

/// A named example program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub name: &'static str,
    pub code: &'static str,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        name: "Hello World",
        code: crate::tabs::STARTER_CODE,
    },
    Sample {
        name: "Read Input",
        code: r#"#include <iostream>
#include <string>

int main() {
    std::string name;
    int age;
    std::cin >> name >> age;
    std::cout << "Hello, " << name << "! Next year you will be " << age + 1 << "." << std::endl;
    return 0;
}
"#,
    },
    Sample {
        name: "Loops and Vectors",
        code: r#"#include <iostream>
#include <vector>

int main() {
    std::vector<int> squares;
    for (int i = 1; i <= 10; ++i) {
        squares.push_back(i * i);
    }

    int total = 0;
    for (int value : squares) {
        std::cout << value << ' ';
        total += value;
    }
    std::cout << "\nSum: " << total << std::endl;
    return 0;
}
"#,
    },
    Sample {
        name: "Functions",
        code: r#"#include <iostream>

long long factorial(int n) {
    return n <= 1 ? 1 : n * factorial(n - 1);
}

bool is_prime(int n) {
    if (n < 2) return false;
    for (int d = 2; d * d <= n; ++d) {
        if (n % d == 0) return false;
    }
    return true;
}

int main() {
    for (int i = 1; i <= 10; ++i) {
        std::cout << i << "! = " << factorial(i)
                  << (is_prime(i) ? " (prime)" : "") << '\n';
    }
    return 0;
}
"#,
    },
];

/// The sample after `index`, wrapping around
pub fn next_index(index: Option<usize>) -> usize {
    match index {
        Some(i) => (i + 1) % SAMPLES.len(),
        None => 0,
    }
}

//! Integer helpers for tile-size enumeration.

pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// All divisors of `n` in ascending order. Empty for `n == 0`.
pub fn divisors(n: usize) -> Vec<usize> {
    let mut low = Vec::new();
    let mut high = Vec::new();

    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            low.push(i);
            if i != n / i {
                high.push(n / i);
            }
        }
        i += 1;
    }

    low.extend(high.into_iter().rev());
    low
}

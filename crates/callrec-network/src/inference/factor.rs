//! Dense factors over discrete variables.
//!
//! Values are stored row-major with the last variable varying fastest, which
//! matches the CPT layout (parents first, node last).

/// A non-negative table over a set of variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    vars: Vec<usize>,
    cards: Vec<usize>,
    values: Vec<f64>,
}

impl Factor {
    pub fn new(vars: Vec<usize>, cards: Vec<usize>, values: Vec<f64>) -> Self {
        debug_assert_eq!(vars.len(), cards.len());
        debug_assert_eq!(values.len(), cards.iter().product::<usize>());
        Self { vars, cards, values }
    }

    /// The neutral element of `product`.
    pub fn unit() -> Self {
        Self::new(Vec::new(), Vec::new(), vec![1.0])
    }

    pub fn vars(&self) -> &[usize] {
        &self.vars
    }

    pub fn cards(&self) -> &[usize] {
        &self.cards
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn contains(&self, var: usize) -> bool {
        self.vars.contains(&var)
    }

    /// Fix `var` to `value` and drop it from the scope.
    pub fn restrict(&self, var: usize, value: usize) -> Factor {
        let Some(pos) = self.vars.iter().position(|&v| v == var) else {
            return self.clone();
        };
        let own = native_strides(&self.cards);
        let mut vars = self.vars.clone();
        let mut cards = self.cards.clone();
        vars.remove(pos);
        cards.remove(pos);

        let source: Vec<usize> = own
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != pos)
            .map(|(_, &s)| s)
            .collect();
        let base = value * own[pos];
        let values = walk(&cards, &[source.as_slice()])
            .map(|idx| self.values[base + idx[0]])
            .collect();
        Factor::new(vars, cards, values)
    }

    /// Pointwise product over the union of both scopes.
    pub fn product(&self, other: &Factor) -> Factor {
        let mut vars = self.vars.clone();
        let mut cards = self.cards.clone();
        for (&v, &c) in other.vars.iter().zip(&other.cards) {
            if !vars.contains(&v) {
                vars.push(v);
                cards.push(c);
            }
        }
        let left = strides_within(&vars, &self.vars, &self.cards);
        let right = strides_within(&vars, &other.vars, &other.cards);
        let values = walk(&cards, &[left.as_slice(), right.as_slice()])
            .map(|idx| self.values[idx[0]] * other.values[idx[1]])
            .collect();
        Factor::new(vars, cards, values)
    }

    /// Marginalize `var` away.
    pub fn sum_out(&self, var: usize) -> Factor {
        let Some(pos) = self.vars.iter().position(|&v| v == var) else {
            return self.clone();
        };
        let mut vars = self.vars.clone();
        let mut cards = self.cards.clone();
        vars.remove(pos);
        cards.remove(pos);

        let target = strides_within(&self.vars, &vars, &cards);
        let mut values = vec![0.0; cards.iter().product()];
        for (offset, idx) in walk(&self.cards, &[target.as_slice()]).enumerate() {
            values[idx[0]] += self.values[offset];
        }
        Factor::new(vars, cards, values)
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Row-major strides of a table with the given cardinalities.
fn native_strides(cards: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; cards.len()];
    for i in (0..cards.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * cards[i + 1];
    }
    strides
}

/// For each variable of `scope`, its stride inside the table over
/// (`vars`, `cards`), or 0 if the table does not mention it.
fn strides_within(scope: &[usize], vars: &[usize], cards: &[usize]) -> Vec<usize> {
    let native = native_strides(cards);
    scope
        .iter()
        .map(|v| {
            vars.iter()
                .position(|w| w == v)
                .map_or(0, |pos| native[pos])
        })
        .collect()
}

/// Enumerate every assignment of `cards` (last variable fastest), yielding the
/// flat index each assignment maps to under every stride set in `strides`.
fn walk<'a>(
    cards: &'a [usize],
    strides: &'a [&'a [usize]],
) -> impl Iterator<Item = Vec<usize>> + 'a {
    let size: usize = cards.iter().product();
    let mut assignment = vec![0usize; cards.len()];
    let mut offsets = vec![0usize; strides.len()];
    (0..size).map(move |step| {
        if step > 0 {
            for k in (0..cards.len()).rev() {
                assignment[k] += 1;
                for (o, s) in offsets.iter_mut().zip(strides) {
                    *o += s[k];
                }
                if assignment[k] < cards[k] {
                    break;
                }
                for (o, s) in offsets.iter_mut().zip(strides) {
                    *o -= s[k] * cards[k];
                }
                assignment[k] = 0;
            }
        }
        offsets.clone()
    })
}

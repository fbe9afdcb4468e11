//! Row-oriented and column-oriented views of the same synthetic user table.

/// One synthetic user, stored as a single struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub age: u8,
}

/// Array of structs: one `User` per row.
pub type UserRows = Vec<User>;

/// Struct of arrays: index `i` in every column describes the same user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserColumns {
    ids: Vec<u32>,
    names: Vec<String>,
    ages: Vec<u8>,
}

impl UserColumns {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            names: Vec::with_capacity(capacity),
            ages: Vec::with_capacity(capacity),
        }
    }

    /// Appends one user across all three columns.
    pub fn push(&mut self, id: u32, name: String, age: u8) {
        self.ids.push(id);
        self.names.push(name);
        self.ages.push(age);
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn ages(&self) -> &[u8] {
        &self.ages
    }

    /// Reassembles row `index`, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<User> {
        Some(User {
            id: *self.ids.get(index)?,
            name: self.names.get(index)?.clone(),
            age: *self.ages.get(index)?,
        })
    }
}

/// Both layouts built from the same `count`.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub rows: UserRows,
    pub columns: UserColumns,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn user_name(index: usize) -> String {
    format!("User {}", index)
}

fn user_age(index: usize) -> u8 {
    (index % 100) as u8
}

/// Builds `count` users in row layout: id = i, age = i mod 100.
pub fn generate_rows(count: usize) -> UserRows {
    (0..count)
        .map(|i| User {
            id: i as u32,
            name: user_name(i),
            age: user_age(i),
        })
        .collect()
}

/// Builds `count` users in column layout with the same contents as `generate_rows`.
pub fn generate_columns(count: usize) -> UserColumns {
    let mut columns = UserColumns::with_capacity(count);
    for i in 0..count {
        columns.push(i as u32, user_name(i), user_age(i));
    }
    columns
}

pub fn generate(count: usize) -> Dataset {
    Dataset {
        rows: generate_rows(count),
        columns: generate_columns(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_empty() {
        let data = generate(0);
        assert!(data.rows.is_empty());
        assert!(data.columns.is_empty());
        assert_eq!(data.columns.ids().len(), 0);
        assert_eq!(data.columns.names().len(), 0);
        assert!(data.columns.row(0).is_none());
    }

    #[test]
    fn test_layouts_agree() {
        let data = generate(257);
        assert_eq!(data.len(), 257);
        assert_eq!(data.rows.len(), 257);
        assert_eq!(data.columns.ids().len(), 257);
        assert_eq!(data.columns.names().len(), 257);
        for (i, user) in data.rows.iter().enumerate() {
            assert_eq!(data.columns.row(i).as_ref(), Some(user));
        }
    }

    #[test]
    fn test_field_values() {
        let rows = generate_rows(205);
        assert_eq!(rows[0], User { id: 0, name: "User 0".to_string(), age: 0 });
        assert_eq!(rows[99].age, 99);
        assert_eq!(rows[100].age, 0);
        assert_eq!(rows[204].id, 204);
        assert_eq!(rows[204].age, 4);
        assert!(rows[204].name.contains("204"));
    }
}

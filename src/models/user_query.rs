use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_SORT: &str = "name";

/// Query string de GET /users.
/// Valores chegam como texto e são validados em `into_request`; parâmetro vazio conta como ausente.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    /// Idade mínima (inclusiva)
    pub min_age: Option<String>,
    /// Role exata contida em `roles`
    pub role: Option<String>,
    /// Substring do nome, sem diferenciar maiúsculas
    pub q: Option<String>,
    /// Tamanho da página (padrão 10)
    pub limit: Option<String>,
    /// Página, começando em 1 (padrão 1)
    pub page: Option<String>,
    /// Campos de ordenação separados por vírgula ou espaço; `-campo` = decrescente (padrão `name`)
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub min_age: Option<f64>,
    pub role: Option<String>,
    pub name_contains: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub sort: Vec<SortField>,
    pub skip: u64,
    pub limit: i64,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn positive_integer(name: &str, value: &Option<String>, default: i64) -> Result<i64, String> {
    match present(value) {
        None => Ok(default),
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("{} must be a positive integer, got \"{}\"", name, raw)),
        },
    }
}

/// `"-age, name"` -> [age desc, name asc]; `id` é alias de `_id`
pub fn parse_sort(raw: &str) -> Vec<SortField> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (descending, field) = match part.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, part.strip_prefix('+').unwrap_or(part)),
            };
            if field.is_empty() {
                return None;
            }
            let field = if field == "id" { "_id" } else { field };
            Some(SortField {
                field: field.to_string(),
                descending,
            })
        })
        .collect()
}

impl ListUsersQuery {
    pub fn into_request(&self, max_page_size: i64) -> Result<(UserFilter, PageRequest), String> {
        let min_age = match present(&self.min_age) {
            None => None,
            Some(raw) => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                _ => return Err(format!("minAge must be a number, got \"{}\"", raw)),
            },
        };

        let filter = UserFilter {
            min_age,
            role: present(&self.role).map(str::to_string),
            name_contains: present(&self.q).map(str::to_string),
        };

        let limit = positive_integer("limit", &self.limit, DEFAULT_LIMIT)?.min(max_page_size);
        let page = positive_integer("page", &self.page, DEFAULT_PAGE)?;

        // O driver serializa skip como i64
        let skip = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| format!("page {} is too large for limit {}", page, limit))?;

        let mut sort = parse_sort(present(&self.sort).unwrap_or(DEFAULT_SORT));
        if sort.is_empty() {
            sort = parse_sort(DEFAULT_SORT);
        }

        let page_request = PageRequest {
            sort,
            skip: skip as u64,
            limit,
        };

        Ok((filter, page_request))
    }
}

use utility::id::HasId;

pub mod location;

pub trait DatabaseRow {
    type Model: HasId;

    fn to_model(self) -> Self::Model;
}

pub fn to_models<R: DatabaseRow>(rows: Vec<R>) -> Vec<R::Model> {
    rows.into_iter().map(DatabaseRow::to_model).collect()
}

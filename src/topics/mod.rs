// Topic model artifacts and the queries made against them.

pub mod coherence;
pub mod corpus;
pub mod dictionary;
pub mod lda;
pub mod tokenize;
pub mod traits;

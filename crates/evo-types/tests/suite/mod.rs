mod generics;
mod type_store;

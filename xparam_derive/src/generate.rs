mod param;
mod table;

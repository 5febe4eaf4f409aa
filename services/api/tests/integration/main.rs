mod categories;
mod comments;
mod entries;
mod users;

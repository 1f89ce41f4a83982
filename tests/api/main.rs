mod activation;
mod health_check;
mod startup;
